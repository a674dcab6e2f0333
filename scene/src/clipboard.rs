//! In-memory clipboard transport.

use std::sync::Arc;

use parking_lot::Mutex;
use snapclip_core::ClipboardTransport;

struct Payload {
    tag: String,
    bytes: Vec<u8>,
}

/// A process-wide clipboard stand-in.
///
/// Holds a single tagged payload at a time, like a system clipboard:
/// setting a payload under any tag replaces whatever was there. Clones
/// share the same slot, so one clipboard can serve several documents or
/// threads.
#[derive(Clone, Default)]
pub struct MemoryClipboard {
    slot: Arc<Mutex<Option<Payload>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

}

impl ClipboardTransport for MemoryClipboard {
    fn set_payload(&mut self, tag: &str, bytes: Vec<u8>) {
        log::debug!("Clipboard now holds {} bytes of {tag}", bytes.len());
        *self.slot.lock() = Some(Payload {
            tag: tag.to_owned(),
            bytes,
        });
    }

    fn has_payload(&self, tag: &str) -> bool {
        self.slot.lock().as_ref().is_some_and(|p| p.tag == tag)
    }

    fn payload(&self, tag: &str) -> Option<Vec<u8>> {
        self.slot
            .lock()
            .as_ref()
            .filter(|p| p.tag == tag)
            .map(|p| p.bytes.clone())
    }
}

impl std::fmt::Debug for MemoryClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.slot.lock().as_ref() {
            Some(p) => write!(f, "MemoryClipboard({}, {} bytes)", p.tag, p.bytes.len()),
            None => write!(f, "MemoryClipboard(empty)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_one_payload() {
        let mut clipboard = MemoryClipboard::new();
        clipboard.set_payload("a/first", vec![1]);
        clipboard.set_payload("b/second", vec![2, 2]);

        assert!(!clipboard.has_payload("a/first"));
        assert_eq!(clipboard.payload("b/second"), Some(vec![2, 2]));
        assert_eq!(format!("{clipboard:?}"), "MemoryClipboard(b/second, 2 bytes)");
    }

    #[test]
    fn clones_share_the_slot() {
        let mut writer = MemoryClipboard::new();
        let mut other = writer.clone();
        writer.set_payload("x/tag", vec![7]);
        assert!(other.has_payload("x/tag"));

        other.set_payload("y/tag", vec![8]);
        assert!(!writer.has_payload("x/tag"));
        assert_eq!(writer.payload("y/tag"), Some(vec![8]));
    }

    #[test]
    fn shared_across_threads() {
        let clipboard = MemoryClipboard::new();
        let mut writer = clipboard.clone();
        std::thread::spawn(move || writer.set_payload("x/tag", vec![1, 2, 3]))
            .join()
            .unwrap();
        assert_eq!(clipboard.payload("x/tag"), Some(vec![1, 2, 3]));
    }
}
