//! Reference-typed, lock-protected nodes.
//!
//! Both value graphs and definition graphs may be cyclic, so their composite
//! nodes live behind `Arc<RwLock<_>>`. Cloning a [`Shared`] clones the handle;
//! identity is the allocation.
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct Shared<T>(Arc<RwLock<T>>);

impl<T> Shared<T> {
    pub fn new(inner: T) -> Self {
        Self(Arc::new(RwLock::new(inner)))
    }

    /// Readers never observe poisoning; a panicked writer leaves whatever it wrote.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the allocation. Stable for as long as any handle is alive.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T: Clone> Shared<T> {
    /// Clone the contents out so no guard is held while the caller recurses.
    pub fn snapshot(&self) -> T {
        self.read().clone()
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

// contents may point back at this node, so only the address is printed
impl<T> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shared({:#x})", self.addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_identity_and_contents() {
        let a = Shared::new(vec![1, 2]);
        let b = a.clone();
        b.write().push(3);
        assert!(a.ptr_eq(&b));
        assert_eq!(a.addr(), b.addr());
        assert_eq!(a.snapshot(), vec![1, 2, 3]);
    }

    #[test]
    fn equal_contents_are_distinct_nodes() {
        let a = Shared::new(vec![1]);
        let b = Shared::new(vec![1]);
        assert!(!a.ptr_eq(&b));
    }
}
