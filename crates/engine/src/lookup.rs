//! Read-through lookups over a fetched snapshot.
//!
//! Settlement code never queries the store for display names: it receives a
//! [`Lookup`] and asks it for entities by key. A [`Roster`] is the snapshot
//! implementation, built from rows fetched right before use.

use std::{collections::HashMap, hash::Hash};

/// Get an entity by key from the current snapshot.
pub trait Lookup<K> {
    type Item;

    fn lookup(&self, key: &K) -> Option<&Self::Item>;
}

/// Entities fetched from the store, indexed by key.
#[derive(Clone, Debug)]
pub struct Roster<K, V> {
    items: HashMap<K, V>,
}

impl<K, V> Roster<K, V>
where
    K: Eq + Hash,
{
    /// Indexes `items` with `key`. On duplicate keys the last item wins.
    pub fn keyed<I, F>(items: I, key: F) -> Self
    where
        I: IntoIterator<Item = V>,
        F: Fn(&V) -> K,
    {
        let items = items.into_iter().map(|item| (key(&item), item)).collect();
        Self { items }
    }
}

impl<K, V> Default for Roster<K, V> {
    fn default() -> Self {
        Self {
            items: HashMap::new(),
        }
    }
}

impl<K, V> Lookup<K> for Roster<K, V>
where
    K: Eq + Hash,
{
    type Item = V;

    fn lookup(&self, key: &K) -> Option<&V> {
        self.items.get(key)
    }
}
