//! Compute-once cell for native handles.

use std::fmt;
use std::sync::{Arc, OnceLock};

/// Memoized native handle attached to an otherwise immutable command.
///
/// The handle is built at most once, on first use, and published atomically; every
/// later reader (and every clone or substituted copy of the command) shares it. The
/// cell is invisible to equality: two commands compare equal regardless of whether
/// either has built its handle yet.
pub struct NativeCell<T> {
    cell: OnceLock<Arc<T>>,
}

impl<T> NativeCell<T> {
    /// Create an empty cell.
    pub fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Get the handle, building it with `init` if this is the first request.
    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> Arc<T> {
        self.cell.get_or_init(|| Arc::new(init())).clone()
    }

    /// Get the handle if it has been built.
    pub fn get(&self) -> Option<&Arc<T>> {
        self.cell.get()
    }

    /// Check whether the handle has been built.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for NativeCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Arc<T>> for NativeCell<T> {
    /// A cell whose handle is already built.
    fn from(handle: Arc<T>) -> Self {
        Self {
            cell: OnceLock::from(handle),
        }
    }
}

impl<T> Clone for NativeCell<T> {
    fn clone(&self) -> Self {
        let cell = OnceLock::new();
        if let Some(handle) = self.cell.get() {
            let _ = cell.set(handle.clone());
        }
        Self { cell }
    }
}

impl<T> PartialEq for NativeCell<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> fmt::Debug for NativeCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_initialized() {
            write!(f, "NativeCell(built)")
        } else {
            write!(f, "NativeCell(empty)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_once() {
        let cell = NativeCell::new();
        let mut calls = 0;
        let a = cell.get_or_init(|| {
            calls += 1;
            7
        });
        let b = cell.get_or_init(|| {
            calls += 1;
            8
        });
        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*b, 7);
    }

    #[test]
    fn test_clone_shares_handle() {
        let cell = NativeCell::new();
        let built = cell.get_or_init(|| String::from("box"));
        let copy = cell.clone();
        assert!(Arc::ptr_eq(copy.get().unwrap(), &built));

        let empty: NativeCell<String> = NativeCell::new();
        assert!(!empty.clone().is_initialized());
        assert_eq!(empty, copy);
    }
}
