//! Resource Cache
//!
//! Append-only storage keyed by generated resource ids.
//!
//! Id allocation produces the smallest positive integer not currently in
//! use, derived from the live entries rather than persisted state: after
//! ids {1, 3} the next allocation yields 2. Caches stay small enough that
//! the linear probe and linear lookups are the whole story.

/// Implemented by records that carry their own cache id.
pub trait CachedResource {
    /// The record's unique positive id.
    fn id(&self) -> u32;
}

/// Append-only collection of id-carrying resource records.
#[derive(Debug, Default)]
pub struct ResourceCache<T> {
    entries: Vec<T>,
}

impl<T: CachedResource> ResourceCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Smallest positive integer no current entry uses as its id.
    ///
    /// An empty cache yields 1.
    #[must_use]
    pub fn next_id(&self) -> u32 {
        let mut candidate = 1;
        while self.entries.iter().any(|entry| entry.id() == candidate) {
            candidate += 1;
        }
        candidate
    }

    /// Appends a record. The caller obtains the id from [`next_id`]
    /// beforehand; nothing here rewrites it.
    ///
    /// [`next_id`]: Self::next_id
    pub fn insert(&mut self, entry: T) {
        debug_assert!(
            entry.id() != 0 && self.get(entry.id()).is_none(),
            "cache ids must be unique positive integers"
        );
        self.entries.push(entry);
    }

    /// Allocates the next id and appends the record `make` builds from
    /// it, returning the id.
    ///
    /// No lookup happens first: loading a path that is already recorded
    /// produces a second entry under a fresh id. Dedup, where wanted, is
    /// the caller's probe via [`find_id`](Self::find_id).
    pub fn insert_with(&mut self, make: impl FnOnce(u32) -> T) -> u32 {
        let id = self.next_id();
        self.insert(make(id));
        id
    }

    /// Looks a record up by id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&T> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Id of the first record matching `pred`, in insertion order.
    pub fn find_id(&self, pred: impl Fn(&T) -> bool) -> Option<u32> {
        self.entries.iter().find(|entry| pred(entry)).map(T::id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}
