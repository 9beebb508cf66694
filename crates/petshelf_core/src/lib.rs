//! Core domain logic for petshelf, a local pet registry.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::pet::{Gender, Pet, PetId, PetValidationError, PetValues};
pub use service::pet_service::PetService;
pub use store::address::{AddressParseError, ContentKind, PetAddress};
pub use store::pet_store::{
    PetColumn, PetQuery, PetRecord, PetRows, PetStore, SqlitePetStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
