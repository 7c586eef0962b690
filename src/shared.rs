use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// A handle to a value that is owned outside the store.
///
/// Entries inserted by reference (see
/// [`DataBag::insert_shared`](crate::DataBag::insert_shared)) are held
/// through a `Shared<T>`: the handle carries the liveness and observer
/// tracking the store relies on. Cloning a handle shares the one value
/// rather than copying it, and every clone, store entries included, sees
/// every mutation. The value is dropped when the last handle goes away, so
/// a store entry can never dangle.
///
/// Borrowing discipline is enforced at runtime: taking any borrow while a
/// write borrow of the same value is live panics. An aliasing bug becomes
/// an immediate diagnostic instead of silent corruption.
///
/// # Examples
///
/// ```
/// use databag::Shared;
///
/// let x = Shared::new(5);
/// let y = x.clone();
///
/// y.set(7);
/// assert_eq!(x.get(), 7);
/// assert!(Shared::ptr_eq(&x, &y));
/// ```
pub struct Shared<T> {
    cell: Rc<RefCell<T>>,
}

impl<T> Shared<T> {
    /// Wraps `value` in a fresh handle with no other observers.
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(RefCell::new(value)),
        }
    }

    /// Read access to the value.
    ///
    /// The borrow lasts until the returned guard is dropped.
    ///
    /// # Panics
    ///
    /// Panics if a write borrow of the value is currently live.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.cell.borrow()
    }

    /// Write access to the value.
    ///
    /// # Panics
    ///
    /// Panics if any other borrow of the value is currently live.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.cell.borrow_mut()
    }

    /// Replaces the value, dropping the old one.
    ///
    /// # Panics
    ///
    /// Panics if any borrow of the value is currently live.
    pub fn set(&self, value: T) {
        self.cell.replace(value);
    }

    /// Returns a clone of the value.
    ///
    /// # Panics
    ///
    /// Panics if a write borrow of the value is currently live.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.cell.borrow().clone()
    }

    /// How many *other* live handles (the caller's clones and store
    /// entries alike) currently observe this value.
    ///
    /// # Examples
    ///
    /// ```
    /// use databag::{DataBag, Shared};
    ///
    /// let x = Shared::new(1.0);
    /// assert_eq!(x.observers(), 0);
    ///
    /// let mut bag = DataBag::new();
    /// bag.insert_shared("x", &x);
    /// assert_eq!(x.observers(), 1);
    ///
    /// drop(bag);
    /// assert_eq!(x.observers(), 0);
    /// ```
    pub fn observers(&self) -> usize {
        Rc::strong_count(&self.cell) - 1
    }

    /// Whether two handles observe the same value.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.cell, &b.cell)
    }

    /// The address of the value, for identity checks only. The pointer is
    /// valid for as long as any handle to the value is.
    pub fn as_ptr(&self) -> *const T {
        RefCell::as_ptr(&self.cell) as *const T
    }
}

impl<T: Any> Shared<T> {
    /// The handle with the pointee type erased, for storage in a slot.
    pub(crate) fn erased(&self) -> Rc<dyn Any> {
        Rc::clone(&self.cell) as Rc<dyn Any>
    }
}

// Manual impl: cloning shares the value, so `T: Clone` must not be required.
impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.try_borrow() {
            Ok(value) => f.debug_tuple("Shared").field(&*value).finish(),
            Err(_) => f.debug_tuple("Shared").field(&"<borrowed>").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_value() {
        let a = Shared::new(vec![1, 2, 3]);
        let b = a.clone();

        b.borrow_mut().push(4);

        assert_eq!(*a.borrow(), vec![1, 2, 3, 4]);
        assert!(Shared::ptr_eq(&a, &b));
        assert_eq!(a.as_ptr(), b.as_ptr());
    }

    #[test]
    fn observers_counts_other_handles() {
        let a = Shared::new(0u8);
        assert_eq!(a.observers(), 0);

        let b = a.clone();
        let c = b.clone();
        assert_eq!(a.observers(), 2);

        drop(b);
        drop(c);
        assert_eq!(a.observers(), 0);
    }

    #[test]
    fn set_and_get_round_trip() {
        let x = Shared::new(String::from("initial"));
        x.set(String::from("replaced"));
        assert_eq!(x.get(), "replaced");
    }

    #[test]
    fn debug_shows_value_or_borrow_state() {
        let x = Shared::new(7);
        assert_eq!(format!("{:?}", x), "Shared(7)");

        let guard = x.borrow_mut();
        assert_eq!(format!("{:?}", x), "Shared(\"<borrowed>\")");
        drop(guard);
    }

    #[test]
    #[should_panic(expected = "already mutably borrowed")]
    fn read_during_write_borrow_panics() {
        let x = Shared::new(1);
        let _write = x.borrow_mut();
        let _read = x.borrow();
    }
}
