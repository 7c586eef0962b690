//! # databag
//!
//! A single-threaded, type-safe store for passing named values between the
//! stages of a computation.
//!
//! `databag` lets loosely coupled parts of a program exchange data of
//! different types through one container, keyed by name. A producer
//! deposits what it has computed; a consumer asks for it back by name and
//! expected type, and the bag checks at runtime that the two agree. An
//! entry either owns its value outright or holds a handle to a value owned
//! elsewhere ([`Shared`]), in which case every access through the bag
//! aliases the producer's own copy.
//!
//! ## Key Features
//!
//! - **Type-safe**: every retrieval is checked against the stored type at runtime
//! - **Two storage modes**: move a value into the bag, or share an externally-owned one
//! - **References, not copies**: retrieval hands back the one underlying value
//! - **Precise errors**: a missing name and a type disagreement are distinct, and each carries what a diagnostic needs
//! - **Single-threaded**: no locks; wrap the whole bag yourself if you must cross threads
//! - **No macros**: pure runtime solution without complex macro magic
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use databag::{BagError, DataBag};
//!
//! fn main() -> Result<(), BagError> {
//!     // One bag carries everything a downstream stage might need.
//!     let mut bag = DataBag::new();
//!
//!     bag.insert("step count", 200u32);
//!     bag.insert("label", String::from("refinement cycle 3"));
//!     bag.insert("residuals", vec![0.5, 0.25, 0.125]);
//!
//!     // Retrieval names the expected type.
//!     let steps = *bag.get::<u32>("step count")?;
//!     println!("running for {} steps", steps);
//!
//!     // Mutation goes through the same lookup.
//!     bag.get_mut::<Vec<f64>>("residuals")?.push(0.0625);
//!     println!("residuals so far: {:?}", *bag.get::<Vec<f64>>("residuals")?);
//!
//!     // A wrong type or a missing name is an error, not a panic.
//!     match bag.get::<f64>("step count") {
//!         Ok(value) => println!("step count: {}", *value),
//!         Err(BagError::TypeMismatch { requested, stored }) => {
//!             println!("asked for {requested}, but the entry holds {stored}")
//!         }
//!         Err(BagError::NameNotFound(name)) => println!("nothing stored under {name}"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Sharing Values with Their Producer
//!
//! ```rust
//! use databag::{BagError, DataBag, Shared};
//!
//! fn main() -> Result<(), BagError> {
//!     let mut bag = DataBag::new();
//!
//!     // The solution vector moves into the bag; the bag owns it now.
//!     bag.insert("solution", vec![1.0, 2.0, 3.0]);
//!
//!     // The iteration counter stays outside; the bag holds a handle.
//!     let iterations = Shared::new(5i32);
//!     bag.insert_shared("iterations", &iterations);
//!
//!     // A consumer reads both through the bag.
//!     let total: f64 = bag.get::<Vec<f64>>("solution")?.iter().sum();
//!     assert_eq!(total, 6.0);
//!     assert_eq!(*bag.get::<i32>("iterations")?, 5);
//!
//!     // The producer keeps updating its own counter...
//!     iterations.set(7);
//!
//!     // ...and the bag sees the new value, because the entry aliases it.
//!     assert_eq!(*bag.get::<i32>("iterations")?, 7);
//!
//!     // Writes through the bag flow back out the same way.
//!     *bag.get_mut::<i32>("iterations")? *= 10;
//!     assert_eq!(iterations.get(), 70);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Overwriting Entries
//!
//! ```rust
//! use databag::{BagError, DataBag, Shared};
//!
//! fn main() -> Result<(), BagError> {
//!     let mut bag = DataBag::new();
//!
//!     // Names are unique: a second insert under the same name replaces
//!     // the first, even when the type or the storage mode changes.
//!     bag.insert("mesh size", 64usize);
//!     bag.insert("mesh size", 0.015625f64);
//!     assert!(bag.get::<usize>("mesh size").is_err());
//!     assert_eq!(*bag.get::<f64>("mesh size")?, 0.015625);
//!
//!     // Replacing an owned entry with a shared one works the same way.
//!     let refined = Shared::new(0.0078125f64);
//!     bag.insert_shared("mesh size", &refined);
//!     assert_eq!(*bag.get::<f64>("mesh size")?, 0.0078125);
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use databag::{BagError, DataBag};
//!
//! let mut bag = DataBag::new();
//! bag.insert("tolerance", 1e-9f64);
//!
//! // A type disagreement names both sides.
//! let err = bag.get::<f32>("tolerance").unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "the requested type `f32` and the stored type `f64` must coincide"
//! );
//!
//! // A missing name echoes the name that was asked for.
//! let err = bag.get::<f64>("tolerances").unwrap_err();
//! assert_eq!(err.to_string(), "no entry with the name `tolerances` exists");
//! ```

mod bag;
mod error;
mod shared;
mod slot;

pub use bag::{DataBag, ValueMut, ValueRef};
pub use error::BagError;
pub use shared::Shared;

// Re-export std::any for convenience
pub use std::any::Any;
