/// A 96-bit entity identifier: slot index plus spawn tick.
///
/// Layout: `u32 index` + `u64 spawn_tick`.
///
/// - **index**: slot in the entity allocator
/// - **spawn_tick**: scene tick when the entity was spawned
///
/// Slots are never recycled, so an identity stays unique for the lifetime
/// of its [`Scene`](crate::Scene) even after the entity is despawned. A
/// despawned identity can be brought back with [`EntityAllocator::revive`]
/// (undo of a deletion) but is never handed to a newly spawned entity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    spawn_tick: u64,
}

impl Entity {
    pub(crate) fn new(index: u32, spawn_tick: u64) -> Self {
        Self { index, spawn_tick }
    }

    /// Returns the slot index of this entity.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the spawn tick of this entity.
    pub fn spawn_tick(&self) -> u64 {
        self.spawn_tick
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({}@{})", self.index, self.spawn_tick)
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({}@{})", self.index, self.spawn_tick)
    }
}

/// Allocates entity ids without ever reusing a slot.
#[derive(Clone)]
pub(crate) struct EntityAllocator {
    /// Spawn tick for each slot. Index = entity index.
    spawn_ticks: Vec<u64>,
    /// Alive flag per slot.
    alive: Vec<bool>,
    /// Total number of currently alive entities.
    count: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            spawn_ticks: Vec::new(),
            alive: Vec::new(),
            count: 0,
        }
    }

    /// Allocates a new entity in a fresh slot.
    ///
    /// Returns `None` once every `u32` index has been handed out.
    pub fn allocate(&mut self, tick: u64) -> Option<Entity> {
        let index = u32::try_from(self.spawn_ticks.len()).ok()?;
        self.spawn_ticks.push(tick);
        self.alive.push(true);
        self.count += 1;
        Some(Entity::new(index, tick))
    }

    /// Allocates `count` entities at once, or none if their indices would
    /// not fit in a `u32`.
    pub fn allocate_many(&mut self, count: usize, tick: u64) -> Option<Vec<Entity>> {
        let len = self.spawn_ticks.len();
        let start = u32::try_from(len).ok()?;
        let end = u32::try_from(len.checked_add(count)?).ok()?;
        self.spawn_ticks.resize(len + count, tick);
        self.alive.resize(len + count, true);
        self.count += end - start;
        Some((start..end).map(|i| Entity::new(i, tick)).collect())
    }

    /// Deallocates an entity. Returns false if already dead or unknown.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.alive[entity.index() as usize] = false;
        self.count -= 1;
        true
    }

    /// Returns `true` if `entity` was allocated here and is currently dead.
    pub fn can_revive(&self, entity: Entity) -> bool {
        let idx = entity.index() as usize;
        idx < self.alive.len() && !self.alive[idx] && self.spawn_ticks[idx] == entity.spawn_tick()
    }

    /// Marks a despawned entity alive again under its old identity.
    pub fn revive(&mut self, entity: Entity) -> bool {
        if !self.can_revive(entity) {
            return false;
        }
        self.alive[entity.index() as usize] = true;
        self.count += 1;
        true
    }

    /// Returns whether the entity is currently alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        let idx = entity.index() as usize;
        idx < self.alive.len() && self.alive[idx] && self.spawn_ticks[idx] == entity.spawn_tick()
    }

    /// Returns the number of alive entities.
    pub fn count(&self) -> u32 {
        self.count
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_sequential() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate(100).unwrap();
        let e1 = alloc.allocate(101).unwrap();

        assert_eq!(e0.index(), 0);
        assert_eq!(e1.index(), 1);
        assert_eq!(e0.spawn_tick(), 100);
        assert_eq!(e1.spawn_tick(), 101);
    }

    #[test]
    fn deallocate_makes_dead() {
        let mut alloc = EntityAllocator::new();
        let entity = alloc.allocate(1).unwrap();
        assert!(alloc.deallocate(entity));
        assert!(!alloc.is_alive(entity));
        // Deallocating again returns false
        assert!(!alloc.deallocate(entity));
    }

    #[test]
    fn slots_are_never_reused() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate(10).unwrap();
        alloc.deallocate(e0);
        let e1 = alloc.allocate(10).unwrap();

        assert_eq!(e1.index(), 1);
        assert_ne!(e0, e1);
        assert!(!alloc.is_alive(e0));
    }

    #[test]
    fn revive_restores_identity() {
        let mut alloc = EntityAllocator::new();
        let entity = alloc.allocate(3).unwrap();
        assert!(!alloc.can_revive(entity));

        alloc.deallocate(entity);
        assert!(alloc.revive(entity));
        assert!(alloc.is_alive(entity));
        assert_eq!(alloc.count(), 1);
        assert!(!alloc.revive(entity));
    }

    #[test]
    fn revive_rejects_foreign_identity() {
        let mut alloc = EntityAllocator::new();
        let entity = alloc.allocate(3).unwrap();
        alloc.deallocate(entity);

        assert!(!alloc.revive(Entity::new(0, 4)));
        assert!(!alloc.revive(Entity::new(9, 3)));
    }

    #[test]
    fn count_tracks_alive() {
        let mut alloc = EntityAllocator::new();
        let batch = alloc.allocate_many(3, 1).unwrap();
        assert_eq!(alloc.count(), 3);
        assert_eq!(batch[2].index(), 2);

        alloc.deallocate(batch[0]);
        assert_eq!(alloc.count(), 2);
    }

    #[test]
    fn allocate_many_rejects_index_overflow() {
        let mut alloc = EntityAllocator::new();
        alloc.allocate(1).unwrap();

        assert!(alloc.allocate_many(u32::MAX as usize, 2).is_none());
        assert!(alloc.allocate_many(usize::MAX, 2).is_none());
        assert_eq!(alloc.count(), 1);
        assert_eq!(alloc.allocate(3).unwrap().index(), 1);
    }

    #[test]
    fn debug_format() {
        let entity = Entity::new(42, 100);
        assert_eq!(format!("{:?}", entity), "Entity(42@100)");
        assert_eq!(format!("{}", entity), "Entity(42@100)");
    }
}
