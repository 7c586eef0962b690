use std::any::{self, Any};
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::error::BagError;
use crate::shared::Shared;
use crate::slot::Slot;

/// A store of named, differently-typed values.
///
/// Each entry lives under a string name and holds either a value owned by
/// the bag ([`insert`](DataBag::insert)) or a handle to a value owned
/// elsewhere ([`insert_shared`](DataBag::insert_shared)). Retrieval is by
/// name plus the expected type; it hands back a reference to the one
/// underlying value, never a copy, and fails with a distinct error when
/// the name is missing or the type disagrees.
///
/// Names are unique: inserting under an existing name replaces the prior
/// entry, whatever its mode or type. There is deliberately no removal or
/// iteration surface: the bag is a parameter-passing channel, not a
/// general collection.
///
/// The bag is single-threaded. It takes no locks and stored values need no
/// `Send` or `Sync`; callers that want cross-thread access must wrap the
/// whole bag in their own synchronization.
///
/// # Examples
///
/// ```
/// use databag::{BagError, DataBag};
///
/// let mut bag = DataBag::new();
/// bag.insert("steps", 200u32);
/// bag.insert("residuals", vec![0.5, 0.25, 0.125]);
///
/// assert_eq!(*bag.get::<u32>("steps")?, 200);
/// bag.get_mut::<Vec<f64>>("residuals")?.push(0.0625);
/// assert_eq!(bag.get::<Vec<f64>>("residuals")?.len(), 4);
/// # Ok::<(), BagError>(())
/// ```
pub struct DataBag {
    entries: HashMap<String, Slot>,
}

impl DataBag {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Stores `value` under `name`, moving it into the bag.
    ///
    /// The bag owns the value from here on: it is dropped when the bag is,
    /// or immediately when the entry is overwritten. Any prior entry under
    /// `name` is replaced. Insertion cannot fail.
    ///
    /// # Examples
    ///
    /// ```
    /// use databag::DataBag;
    ///
    /// let mut bag = DataBag::new();
    /// let weights = vec![0.25, 0.5, 0.25];
    /// bag.insert("weights", weights.clone());
    ///
    /// // The bag holds its own copy; the original is untouched.
    /// assert_eq!(*bag.get::<Vec<f64>>("weights").unwrap(), weights);
    /// ```
    pub fn insert<T: Any>(&mut self, name: impl Into<String>, value: T) {
        self.entries.insert(name.into(), Slot::owned(value));
    }

    /// Stores a handle to an externally-owned value under `name`.
    ///
    /// Only the handle is captured, never the data, so the entry aliases
    /// the caller's value: mutations through the bag are visible through
    /// `handle` and every other clone of it, and the other way round. Any prior entry under `name` is replaced. Insertion cannot
    /// fail.
    ///
    /// # Examples
    ///
    /// ```
    /// use databag::{DataBag, Shared};
    ///
    /// let mut bag = DataBag::new();
    /// let iterations = Shared::new(0u64);
    /// bag.insert_shared("iterations", &iterations);
    ///
    /// iterations.set(12);
    /// assert_eq!(*bag.get::<u64>("iterations").unwrap(), 12);
    /// ```
    pub fn insert_shared<T: Any>(&mut self, name: impl Into<String>, handle: &Shared<T>) {
        self.entries.insert(name.into(), Slot::shared(handle));
    }

    /// Read access to the entry under `name`, checked against type `T`.
    ///
    /// Resolution is by exact type: the entry must have been inserted as a
    /// `T`, whether owned or shared; related or convertible types never
    /// match. On success the guard aliases the single underlying value.
    ///
    /// # Errors
    ///
    /// - [`BagError::NameNotFound`] if nothing was ever inserted under
    ///   `name`.
    /// - [`BagError::TypeMismatch`] if the entry holds some other type;
    ///   the error carries both type names.
    ///
    /// # Panics
    ///
    /// Panics if the entry is shared and a write borrow of its value is
    /// live elsewhere.
    ///
    /// # Examples
    ///
    /// ```
    /// use databag::{BagError, DataBag};
    ///
    /// let mut bag = DataBag::new();
    /// bag.insert("tolerance", 1e-9f64);
    ///
    /// assert_eq!(*bag.get::<f64>("tolerance")?, 1e-9);
    /// assert!(matches!(
    ///     bag.get::<f32>("tolerance"),
    ///     Err(BagError::TypeMismatch { .. })
    /// ));
    /// assert!(matches!(
    ///     bag.get::<f64>("tolernace"),
    ///     Err(BagError::NameNotFound(_))
    /// ));
    /// # Ok::<(), BagError>(())
    /// ```
    pub fn get<T: Any>(&self, name: &str) -> Result<ValueRef<'_, T>, BagError> {
        let slot = self
            .entries
            .get(name)
            .ok_or_else(|| BagError::NameNotFound(name.to_owned()))?;
        let mismatch = BagError::TypeMismatch {
            requested: any::type_name::<T>(),
            stored: slot.type_name(),
        };
        if slot.holds::<T>() {
            match slot {
                Slot::Owned { value, .. } => {
                    if let Some(value) = value.downcast_ref::<T>() {
                        return Ok(ValueRef {
                            inner: RefInner::Plain(value),
                        });
                    }
                }
                Slot::Shared { cell, .. } => {
                    if let Some(cell) = cell.downcast_ref::<RefCell<T>>() {
                        return Ok(ValueRef {
                            inner: RefInner::Cell(cell.borrow()),
                        });
                    }
                }
            }
        }
        Err(mismatch)
    }

    /// Write access to the entry under `name`, checked against type `T`.
    ///
    /// Same resolution as [`get`](DataBag::get), differing only in the
    /// returned guard's mutability. Mutations land in the single
    /// underlying value: the bag's own storage for an owned entry, the
    /// external value for a shared one.
    ///
    /// # Errors
    ///
    /// - [`BagError::NameNotFound`] if nothing was ever inserted under
    ///   `name`.
    /// - [`BagError::TypeMismatch`] if the entry holds some other type;
    ///   the error carries both type names.
    ///
    /// # Panics
    ///
    /// Panics if the entry is shared and any borrow of its value is live
    /// elsewhere.
    ///
    /// # Examples
    ///
    /// ```
    /// use databag::{BagError, DataBag};
    ///
    /// let mut bag = DataBag::new();
    /// bag.insert("count", 3i64);
    ///
    /// *bag.get_mut::<i64>("count")? += 1;
    /// assert_eq!(*bag.get::<i64>("count")?, 4);
    /// # Ok::<(), BagError>(())
    /// ```
    pub fn get_mut<T: Any>(&mut self, name: &str) -> Result<ValueMut<'_, T>, BagError> {
        let slot = self
            .entries
            .get_mut(name)
            .ok_or_else(|| BagError::NameNotFound(name.to_owned()))?;
        let mismatch = BagError::TypeMismatch {
            requested: any::type_name::<T>(),
            stored: slot.type_name(),
        };
        if slot.holds::<T>() {
            match slot {
                Slot::Owned { value, .. } => {
                    if let Some(value) = value.downcast_mut::<T>() {
                        return Ok(ValueMut {
                            inner: MutInner::Plain(value),
                        });
                    }
                }
                Slot::Shared { cell, .. } => {
                    if let Some(cell) = cell.downcast_ref::<RefCell<T>>() {
                        return Ok(ValueMut {
                            inner: MutInner::Cell(cell.borrow_mut()),
                        });
                    }
                }
            }
        }
        Err(mismatch)
    }
}

impl Default for DataBag {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DataBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, slot) in &self.entries {
            map.entry(name, &slot.type_name());
        }
        map.finish()
    }
}

/// Read guard for a value in a [`DataBag`], returned by
/// [`get`](DataBag::get).
///
/// Derefs to the stored `T`. For a shared entry the guard holds the read
/// borrow of the external value until dropped.
pub struct ValueRef<'a, T> {
    inner: RefInner<'a, T>,
}

enum RefInner<'a, T> {
    Plain(&'a T),
    Cell(Ref<'a, T>),
}

impl<T> Deref for ValueRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.inner {
            RefInner::Plain(value) => value,
            RefInner::Cell(value) => value,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}

impl<T: fmt::Display> fmt::Display for ValueRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}

/// Write guard for a value in a [`DataBag`], returned by
/// [`get_mut`](DataBag::get_mut).
///
/// Derefs to the stored `T`. For a shared entry the guard holds the write
/// borrow of the external value until dropped.
pub struct ValueMut<'a, T> {
    inner: MutInner<'a, T>,
}

enum MutInner<'a, T> {
    Plain(&'a mut T),
    Cell(RefMut<'a, T>),
}

impl<T> Deref for ValueMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.inner {
            MutInner::Plain(value) => value,
            MutInner::Cell(value) => value,
        }
    }
}

impl<T> DerefMut for ValueMut<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.inner {
            MutInner::Plain(value) => value,
            MutInner::Cell(value) => value,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ValueMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}

impl<T: fmt::Display> fmt::Display for ValueMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_is_a_legal_key() {
        let mut bag = DataBag::new();
        bag.insert("", 9i32);
        assert_eq!(*bag.get::<i32>("").unwrap(), 9);
    }

    #[test]
    fn owned_handle_is_not_a_shared_entry() {
        let mut bag = DataBag::new();
        let handle = Shared::new(3i32);

        // Storing the handle *by value* records the handle type, not i32.
        bag.insert("as_value", handle.clone());
        bag.insert_shared("as_ref", &handle);

        assert!(matches!(
            bag.get::<i32>("as_value"),
            Err(BagError::TypeMismatch { .. })
        ));
        assert_eq!(*bag.get::<i32>("as_ref").unwrap(), 3);
        assert!(Shared::ptr_eq(
            &bag.get::<Shared<i32>>("as_value").unwrap(),
            &handle
        ));
    }

    #[test]
    fn mismatch_reports_both_type_names() {
        let mut bag = DataBag::new();
        bag.insert("x", 1u32);

        match bag.get::<String>("x") {
            Err(BagError::TypeMismatch { requested, stored }) => {
                assert!(requested.contains("String"), "requested: {requested}");
                assert!(stored.contains("u32"), "stored: {stored}");
            }
            other => panic!("expected a type mismatch, got {other:?}"),
        };
    }

    #[test]
    fn mismatch_on_shared_entries_reports_pointee_type() {
        let mut bag = DataBag::new();
        let x = Shared::new(2.5f64);
        bag.insert_shared("x", &x);

        match bag.get_mut::<f32>("x") {
            Err(BagError::TypeMismatch { requested, stored }) => {
                assert!(requested.contains("f32"), "requested: {requested}");
                assert!(stored.contains("f64"), "stored: {stored}");
            }
            other => panic!("expected a type mismatch, got {other:?}"),
        };
    }

    #[test]
    fn debug_lists_names_and_types() {
        let mut bag = DataBag::new();
        bag.insert("steps", 10u32);

        let rendered = format!("{bag:?}");
        assert!(rendered.contains("\"steps\""), "rendered: {rendered}");
        assert!(rendered.contains("u32"), "rendered: {rendered}");
    }

    #[test]
    fn guards_format_like_the_value() {
        let mut bag = DataBag::new();
        bag.insert("pi", 3.5f64);

        assert_eq!(format!("{}", bag.get::<f64>("pi").unwrap()), "3.5");
        assert_eq!(format!("{:?}", bag.get_mut::<f64>("pi").unwrap()), "3.5");
    }
}
