use std::collections::HashSet;
use std::hash::Hash;

/// The keys whose note-on went out and whose note-off has not.
#[derive(Debug, Clone)]
pub struct KeyState<K> {
    down: HashSet<K>,
}

impl<K: Eq + Hash + Copy> KeyState<K> {
    pub fn new() -> Self {
        KeyState {
            down: HashSet::new(),
        }
    }

    pub fn is_down(&self, key: K) -> bool {
        self.down.contains(&key)
    }

    /// Returns `true` if the key was up before.
    pub fn mark_down(&mut self, key: K) -> bool {
        self.down.insert(key)
    }

    /// Returns `true` if the key was down before.
    pub fn mark_up(&mut self, key: K) -> bool {
        self.down.remove(&key)
    }

    /// Forgets every held key, handing them back.
    pub fn clear(&mut self) -> Vec<K> {
        self.down.drain().collect()
    }

    pub fn len(&self) -> usize {
        self.down.len()
    }

    pub fn is_empty(&self) -> bool {
        self.down.is_empty()
    }
}

impl<K: Eq + Hash + Copy> Default for KeyState<K> {
    fn default() -> Self {
        Self::new()
    }
}
