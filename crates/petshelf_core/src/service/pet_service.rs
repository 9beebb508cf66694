//! Pet use-case service.
//!
//! # Responsibility
//! - Provide typed entry points for the catalog and editor flows.
//! - Delegate routing, validation and persistence to the store contract.
//!
//! # Invariants
//! - Service APIs never bypass store validation.
//! - Service layer remains storage-agnostic.

use crate::model::pet::{Gender, Pet, PetId, PetValues};
use crate::store::address::PetAddress;
use crate::store::pet_store::{PetColumn, PetQuery, PetStore, StoreError, StoreResult};

/// Name, breed and weight of the built-in sample pet.
///
/// Mirrors the catalog's "insert sample data" action.
const SAMPLE_PET_NAME: &str = "Toto";
const SAMPLE_PET_BREED: &str = "Terrier";
const SAMPLE_PET_WEIGHT: i64 = 7;

/// Use-case wrapper over a pet store implementation.
pub struct PetService<S: PetStore> {
    store: S,
}

impl<S: PetStore> PetService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Adds a pet and returns its storage-assigned id.
    pub fn add_pet(
        &self,
        name: impl Into<String>,
        breed: Option<String>,
        gender: Gender,
        weight: i64,
    ) -> StoreResult<PetId> {
        let values = PetValues::new_pet(name, breed, gender, weight);
        let address = self.store.insert(&PetAddress::Collection, &values)?;
        match address {
            PetAddress::Item(id) => Ok(id),
            PetAddress::Collection => Err(StoreError::InvalidData(
                "insert returned a collection address".to_string(),
            )),
        }
    }

    /// Inserts the built-in sample pet (the catalog's demo entry).
    pub fn insert_sample_pet(&self) -> StoreResult<PetId> {
        self.add_pet(
            SAMPLE_PET_NAME,
            Some(SAMPLE_PET_BREED.to_string()),
            Gender::Male,
            SAMPLE_PET_WEIGHT,
        )
    }

    /// Gets one pet by id. Returns `None` when no row matches.
    pub fn get_pet(&self, id: PetId) -> StoreResult<Option<Pet>> {
        let rows = self
            .store
            .query(&PetAddress::Item(id), &full_projection_query())?;
        let mut pets = rows.into_pets()?;
        Ok(pets.pop())
    }

    /// Lists all pets in catalog order (by name, then id).
    pub fn list_pets(&self) -> StoreResult<Vec<Pet>> {
        let request = PetQuery {
            sort_order: Some("name ASC, id ASC".to_string()),
            ..full_projection_query()
        };
        let rows = self.store.query(&PetAddress::Collection, &request)?;
        rows.into_pets()
    }

    /// Updates present fields of one pet; returns the modified count (0 or 1).
    pub fn update_pet(&self, id: PetId, values: &PetValues) -> StoreResult<usize> {
        self.store.update(&PetAddress::Item(id), values, None, &[])
    }

    /// Deletes one pet by id; returns the deleted count (0 or 1).
    pub fn delete_pet(&self, id: PetId) -> StoreResult<usize> {
        self.store.delete(&PetAddress::Item(id), None, &[])
    }

    /// Deletes every pet; returns the deleted count.
    pub fn delete_all_pets(&self) -> StoreResult<usize> {
        self.store.delete(&PetAddress::Collection, None, &[])
    }
}

fn full_projection_query() -> PetQuery {
    PetQuery {
        projection: Some(PetColumn::ALL.to_vec()),
        ..PetQuery::default()
    }
}
