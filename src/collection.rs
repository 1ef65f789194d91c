use crate::objects::{Id, Type};
use crate::Error;
use id_arena::Arena;
use std::collections::{hash_map::Entry, HashMap};
use std::fmt;
use std::ops;

/// Typed handle of an object stored in a [Collection]
///
/// Handles are stable for the lifetime of the feed, they are what links the objects together.
pub use id_arena::Id as Index;

/// Objects of one kind, stored in the order they were inserted and addressable by their raw id
pub struct Collection<T> {
    storage: Arena<T>,
    ids: HashMap<String, Index<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Collection {
            storage: Arena::new(),
            ids: HashMap::default(),
        }
    }
}

impl<T: Id + Type> Collection<T> {
    /// Inserts the object, an object with the same id is never replaced
    pub fn insert(&mut self, o: T) -> Result<Index<T>, Error> {
        match self.ids.entry(o.id().to_owned()) {
            Entry::Occupied(_) => Err(Error::DuplicateId {
                object_type: o.object_type(),
                id: o.id().to_owned(),
            }),
            Entry::Vacant(e) => {
                let index = self.storage.alloc(o);
                e.insert(index);
                Ok(index)
            }
        }
    }
}

impl<T> Collection<T> {
    pub fn get(&self, i: Index<T>) -> Option<&T> {
        self.storage.get(i)
    }

    pub(crate) fn get_mut(&mut self, i: Index<T>) -> Option<&mut T> {
        self.storage.get_mut(i)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&T> {
        self.ids.get(id).and_then(|idx| self.storage.get(*idx))
    }

    pub(crate) fn get_mut_by_id(&mut self, id: &str) -> Option<&mut T> {
        let idx = self.ids.get(id)?;
        self.storage.get_mut(*idx)
    }

    pub fn get_index(&self, id: &str) -> Option<Index<T>> {
        self.ids.get(id).copied()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the `(Index<T>, &T)` of the collection, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (Index<T>, &T)> {
        self.storage.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.storage.iter().map(|(_, o)| o)
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.storage.iter_mut().map(|(_, o)| o)
    }
}

impl<T> ops::Index<Index<T>> for Collection<T> {
    type Output = T;
    fn index(&self, i: Index<T>) -> &T {
        &self.storage[i]
    }
}

impl<T: fmt::Debug> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.values()).finish()
    }
}
