use std::any::{self, Any, TypeId};
use std::fmt;
use std::rc::Rc;

use crate::shared::Shared;

/// A single type-erased entry: the value (or a handle to it) plus the
/// concrete type identity recorded at insertion.
///
/// The ownership mode is an explicit discriminant, never inferred from the
/// stored representation; an owned value that happens to be a handle type
/// is still `Owned`.
pub(crate) enum Slot {
    /// A value moved into the store, dropped with it or on overwrite.
    Owned {
        value: Box<dyn Any>,
        type_id: TypeId,
        type_name: &'static str,
    },
    /// A handle to a value owned elsewhere. The erased box is the handle's
    /// `RefCell<T>` behind its `Rc`; the store never holds the data itself.
    Shared {
        cell: Rc<dyn Any>,
        type_id: TypeId,
        type_name: &'static str,
    },
}

impl Slot {
    pub(crate) fn owned<T: Any>(value: T) -> Self {
        Slot::Owned {
            value: Box::new(value),
            type_id: TypeId::of::<T>(),
            type_name: any::type_name::<T>(),
        }
    }

    pub(crate) fn shared<T: Any>(handle: &Shared<T>) -> Self {
        Slot::Shared {
            cell: handle.erased(),
            type_id: TypeId::of::<T>(),
            type_name: any::type_name::<T>(),
        }
    }

    /// Whether the recorded concrete type is exactly `T`, regardless of
    /// ownership mode.
    pub(crate) fn holds<T: Any>(&self) -> bool {
        self.type_id() == TypeId::of::<T>()
    }

    pub(crate) fn type_id(&self) -> TypeId {
        match self {
            Slot::Owned { type_id, .. } | Slot::Shared { type_id, .. } => *type_id,
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Slot::Owned { type_name, .. } | Slot::Shared { type_name, .. } => type_name,
        }
    }
}

// The erased payloads have no `Debug`; render the mode and recorded type.
impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self {
            Slot::Owned { .. } => "Owned",
            Slot::Shared { .. } => "Shared",
        };
        f.debug_tuple(mode).field(&self.type_name()).finish()
    }
}
