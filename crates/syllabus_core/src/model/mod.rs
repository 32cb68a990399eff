//! Domain records for the curriculum schema.
//!
//! # Responsibility
//! - Define the typed shapes exchanged with repository callers.
//! - Mirror column names 1:1 so serialized records match the tables.
//!
//! # Invariants
//! - Identifiers of instructors and topics are generated by the store.
//! - Partial-update inputs are optional-field structs, never untyped maps.

pub mod instructor;
pub mod topic;
pub mod week;
