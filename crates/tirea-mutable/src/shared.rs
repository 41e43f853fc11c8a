//! Shared pointer members.

use crate::member::Composite;
use crate::setter::Applied;
use crate::{ChangedField, MutableError, MutableResult, SetInput, SetOptions};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::any::type_name;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A shared, mutable pointee.
///
/// Clones point at the same value, so a checkpoint taken by `reset` shares the
/// pointee with the live object. Without `#[mutable(deep)]` a change made
/// through the pointer is therefore invisible to analysis; with it, a
/// trackable pointee reports its own changes.
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    /// Allocate a new pointee.
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Immutably borrow the pointee.
    ///
    /// # Panics
    ///
    /// Panics if the pointee is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Mutably borrow the pointee.
    ///
    /// # Panics
    ///
    /// Panics if the pointee is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// True if both handles point at the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn try_borrow_mut(&self) -> MutableResult<RefMut<'_, T>> {
        self.0
            .try_borrow_mut()
            .map_err(|_| MutableError::already_borrowed(type_name::<T>()))
    }

    fn try_borrow(&self) -> MutableResult<Ref<'_, T>> {
        self.0
            .try_borrow()
            .map_err(|_| MutableError::already_borrowed(type_name::<T>()))
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: PartialEq> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.borrow() == *other.borrow()
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for Shared<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(value) => f.debug_tuple("Shared").field(&*value).finish(),
            Err(_) => f.write_str("Shared(<borrowed>)"),
        }
    }
}

impl<T: Serialize> Serialize for Shared<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.borrow().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Shared<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Shared::new)
    }
}

impl<T: Composite> Composite for Shared<T> {
    fn reset_nested(&mut self) -> MutableResult<()> {
        self.try_borrow_mut()?.reset_nested()
    }

    fn analyze_deep(&mut self, name: &str, original: &Self) -> MutableResult<Option<ChangedField>> {
        if self.ptr_eq(original) {
            return self.analyze_own(name);
        }
        let original = original.try_borrow()?;
        self.try_borrow_mut()?.analyze_deep(name, &original)
    }

    fn analyze_own(&mut self, name: &str) -> MutableResult<Option<ChangedField>> {
        self.try_borrow_mut()?.analyze_own(name)
    }

    fn set_nested(
        &mut self,
        prefix: &str,
        path: &str,
        input: SetInput,
        options: &SetOptions,
    ) -> MutableResult<Applied> {
        self.try_borrow_mut()?
            .set_nested(prefix, path, input, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_pointee() {
        let a = Shared::new(vec![1, 2]);
        let b = a.clone();
        b.borrow_mut().push(3);
        assert!(a.ptr_eq(&b));
        assert_eq!(*a.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_eq_compares_pointees() {
        let a = Shared::new(5);
        let b = Shared::new(5);
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
        *b.borrow_mut() = 6;
        assert_ne!(a, b);
    }

    #[test]
    fn test_serde_is_transparent() {
        let a = Shared::new(vec!["x".to_string()]);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, r#"["x"]"#);
        let back: Shared<Vec<String>> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn test_try_borrow_mut_reports_conflict() {
        let a = Shared::new(1);
        let _guard = a.borrow();
        let err = a.try_borrow_mut().unwrap_err();
        assert!(err.to_string().contains("already borrowed"));
    }
}
