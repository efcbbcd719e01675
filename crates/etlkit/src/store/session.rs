//! Scoped acquisition of an extractor connection.

// dependencies
use std::ops::{Deref, DerefMut};
use super::Extractor;
use crate::error::Result;

/// A Session connects a store when opened and closes it when dropped, so
/// the store is released whether the enclosing work succeeds or fails.
pub struct Session<'a, E: Extractor> {
    store: &'a mut E,
}
impl<'a, E: Extractor> Session<'a, E> {
    /// Connect the store. If connecting fails, the store is still closed
    /// before the error is returned.
    pub fn open(store: &'a mut E) -> Result<Self> {
        if let Err(e) = store.connect() {
            store.close();
            return Err(e);
        }
        Ok(Self { store })
    }
}
impl<E: Extractor> Deref for Session<'_, E> {
    type Target = E;
    fn deref(&self) -> &E {
        self.store
    }
}
impl<E: Extractor> DerefMut for Session<'_, E> {
    fn deref_mut(&mut self) -> &mut E {
        self.store
    }
}
impl<E: Extractor> Drop for Session<'_, E> {
    fn drop(&mut self) {
        self.store.close();
    }
}
