//! Minimal tree and codec used by the unit tests of this crate.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::codec::{Blob, SnapshotCodec};
use crate::error::{Result, SnapshotError};
use crate::tree::{HierarchyTree, IdentityPolicy};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestContent {
    pub id: u32,
    pub label: String,
    pub refs: Vec<String>,
    pub children: Vec<TestContent>,
}

#[derive(Clone)]
struct TestNode {
    parent: Option<u32>,
    children: Vec<u32>,
    label: String,
    refs: Vec<String>,
}

#[derive(Clone, Default)]
pub struct TestTree {
    nodes: HashMap<u32, TestNode>,
    roots: Vec<u32>,
    next_id: u32,
    pub resolved_refs: BTreeSet<String>,
    pub mutations: usize,
    /// Makes `replace_content` and `insert_subtree` refuse content
    /// captured from this id.
    pub refuse: Option<u32>,
}

impl TestTree {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    pub fn add(&mut self, parent: Option<u32>, label: &str) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            TestNode {
                parent,
                children: Vec::new(),
                label: label.to_string(),
                refs: Vec::new(),
            },
        );
        self.siblings_mut(parent).push(id);
        id
    }

    pub fn add_ref(&mut self, id: u32, reference: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.refs.push(reference.to_string());
        }
    }

    pub fn label(&self, id: u32) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.label.as_str())
    }

    pub fn set_label(&mut self, id: u32, label: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.label = label.to_string();
        }
    }

    pub fn labels(&self, parent: Option<u32>) -> Vec<String> {
        self.children_of(parent)
            .iter()
            .filter_map(|&id| self.label(id).map(str::to_string))
            .collect()
    }

    fn siblings_mut(&mut self, parent: Option<u32>) -> &mut Vec<u32> {
        match parent {
            Some(p) => &mut self.nodes.get_mut(&p).expect("parent exists").children,
            None => &mut self.roots,
        }
    }

    fn check_refused(&self, id: u32) -> Result<()> {
        if self.refuse == Some(id) {
            return Err(SnapshotError::Tree(format!("{id} is refused")));
        }
        Ok(())
    }

    fn content_of(&self, id: u32) -> TestContent {
        let node = &self.nodes[&id];
        TestContent {
            id,
            label: node.label.clone(),
            refs: node.refs.clone(),
            children: node.children.iter().map(|&c| self.content_of(c)).collect(),
        }
    }

    fn drop_subtree(&mut self, id: u32) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.drop_subtree(child);
            }
        }
    }

    fn materialize(
        &mut self,
        parent: Option<u32>,
        content: TestContent,
        identity: IdentityPolicy,
    ) -> Result<u32> {
        let id = match identity {
            IdentityPolicy::Preserve => {
                if self.nodes.contains_key(&content.id) {
                    return Err(SnapshotError::Tree(format!("{} is alive", content.id)));
                }
                self.next_id = self.next_id.max(content.id + 1);
                content.id
            }
            IdentityPolicy::Fresh => {
                self.next_id += 1;
                self.next_id - 1
            }
        };
        self.resolved_refs.extend(content.refs.iter().cloned());
        self.nodes.insert(
            id,
            TestNode {
                parent,
                children: Vec::new(),
                label: content.label,
                refs: content.refs,
            },
        );
        for child in content.children {
            let child_id = self.materialize(Some(id), child, identity)?;
            self.nodes.get_mut(&id).expect("just inserted").children.push(child_id);
        }
        Ok(id)
    }
}

impl HierarchyTree for TestTree {
    type Id = u32;
    type RefId = String;
    type Content = TestContent;
    type Checkpoint = TestTree;

    fn contains(&self, id: u32) -> bool {
        self.nodes.contains_key(&id)
    }

    fn parent_of(&self, id: u32) -> Option<u32> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    fn children_of(&self, parent: Option<u32>) -> &[u32] {
        match parent {
            Some(p) => self.nodes.get(&p).map(|n| n.children.as_slice()).unwrap_or(&[]),
            None => &self.roots,
        }
    }

    fn replace_content(
        &mut self,
        id: u32,
        content: TestContent,
        refs: &BTreeSet<String>,
    ) -> Result<()> {
        self.check_refused(content.id)?;
        let old_children = match self.nodes.get_mut(&id) {
            Some(node) => {
                node.label = content.label;
                node.refs = content.refs;
                std::mem::take(&mut node.children)
            }
            None => return Err(SnapshotError::not_found(id)),
        };
        for child in old_children {
            self.drop_subtree(child);
        }
        for child in content.children {
            let child_id = self.materialize(Some(id), child, IdentityPolicy::Preserve)?;
            self.nodes.get_mut(&id).expect("live").children.push(child_id);
        }
        self.resolved_refs.extend(refs.iter().cloned());
        self.mutations += 1;
        Ok(())
    }

    fn insert_subtree(
        &mut self,
        parent: Option<u32>,
        anchor: Option<u32>,
        content: TestContent,
        identity: IdentityPolicy,
    ) -> Result<u32> {
        self.check_refused(content.id)?;
        if let Some(p) = parent
            && !self.contains(p)
        {
            return Err(SnapshotError::not_found(p));
        }
        let id = self.materialize(parent, content, identity)?;
        let siblings = self.siblings_mut(parent);
        let at = anchor
            .and_then(|a| siblings.iter().position(|&s| s == a))
            .unwrap_or(siblings.len());
        siblings.insert(at, id);
        self.mutations += 1;
        Ok(id)
    }

    fn remove_subtree(&mut self, id: u32) -> Result<()> {
        if !self.contains(id) {
            return Err(SnapshotError::not_found(id));
        }
        let parent = self.parent_of(id);
        self.siblings_mut(parent).retain(|&s| s != id);
        self.drop_subtree(id);
        self.mutations += 1;
        Ok(())
    }

    fn checkpoint(&self) -> TestTree {
        self.clone()
    }

    fn rollback(&mut self, checkpoint: TestTree) {
        *self = checkpoint;
    }
}

/// RON-backed codec for [`TestTree`].
pub struct TestCodec;

fn collect_refs(content: &TestContent, out: &mut BTreeSet<String>) {
    out.extend(content.refs.iter().cloned());
    for child in &content.children {
        collect_refs(child, out);
    }
}

impl SnapshotCodec<TestTree> for TestCodec {
    fn encode(&self, tree: &TestTree, root: u32) -> Result<(Blob, BTreeSet<String>)> {
        if !tree.contains(root) {
            return Err(SnapshotError::not_found(root));
        }
        let content = tree.content_of(root);
        let mut refs = BTreeSet::new();
        collect_refs(&content, &mut refs);
        let text = ron::to_string(&content).map_err(|e| SnapshotError::Codec(e.to_string()))?;
        Ok((Blob::new(text.into_bytes()), refs))
    }

    fn decode(&self, blob: &Blob) -> Result<TestContent> {
        let text =
            std::str::from_utf8(blob.as_bytes()).map_err(|e| SnapshotError::Codec(e.to_string()))?;
        ron::from_str(text).map_err(|e| SnapshotError::Codec(e.to_string()))
    }
}

/// `Root -> [A, B, C]`, returning `(root, a, b, c)`.
pub fn abc_tree() -> (TestTree, u32, u32, u32, u32) {
    let mut tree = TestTree::new();
    let root = tree.add(None, "Root");
    let a = tree.add(Some(root), "A");
    let b = tree.add(Some(root), "B");
    let c = tree.add(Some(root), "C");
    (tree, root, a, b, c)
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
