//! Domain model for the pet registry.
//!
//! # Responsibility
//! - Define the canonical pet record and its closed gender enumeration.
//! - Own the field-level validation rules shared by insert and update.
//!
//! # Invariants
//! - A persisted pet always has a non-blank name, an in-range gender code
//!   and a non-negative weight.
//! - `id` is assigned by storage on insert and never reused while the row
//!   exists.

pub mod pet;
