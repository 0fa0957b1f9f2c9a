//! Declarative forms for the data-entry screens.
//!
//! Screens declare an ordered list of fields (widget kind, options,
//! labels) and get schema-driven validation for free: values are
//! collected into a [`FormValues`] map, [`FormSchema::validate`] returns
//! every problem at once, and [`FormSchema::submit`] only invokes the
//! caller's handler when the input is clean.

pub mod schema;
pub mod validate;

pub use schema::{Choice, FieldKind, FieldSpec};
pub use validate::{FieldError, FormSchema, FormValues};
