//! Pet store: address resolution, routing and validated CRUD.
//!
//! # Responsibility
//! - Resolve logical addresses to collection or single-item scope.
//! - Route the four store operations to SQL with field-set validation.
//!
//! # Invariants
//! - Item-scoped operations always resolve to `id = ?` and ignore any
//!   caller-supplied filter.
//! - Field sets are validated before any SQL mutation runs.
//! - Every failure surfaces as a typed [`pet_store::StoreError`]; nothing
//!   is swallowed or retried.

pub mod address;
pub mod pet_store;
