use thiserror::Error;

/// Errors that can occur when retrieving from a [`DataBag`](crate::DataBag).
///
/// Insertion never fails; both kinds are raised only by lookup, and both
/// point at a disagreement between the code that stored an entry and the
/// code asking for it back.
#[derive(Debug, Error)]
pub enum BagError {
    /// No entry with the requested name exists.
    #[error("no entry with the name `{0}` exists")]
    NameNotFound(String),

    /// An entry exists under the name, but it holds a different type.
    #[error("the requested type `{requested}` and the stored type `{stored}` must coincide")]
    TypeMismatch {
        /// The type the caller asked for, per [`std::any::type_name`].
        requested: &'static str,
        /// The type recorded when the entry was inserted.
        stored: &'static str,
    },
}
