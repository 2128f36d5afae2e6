//! The CMI data model.
//!
//! A typed, path-addressed attribute tree: field primitives described by
//! static specs, aggregates and collections composing them into the
//! standardized namespace, and the runtime tree carrying session values.

pub mod field;
pub mod schema;
pub mod tree;

pub use field::{Access, FieldKind, FieldSpec, ReadRule, WriteRule};
pub use schema::ROOT_NAME;
pub use tree::CmiTree;
