//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `petshelf_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use petshelf_core::db::open_db_in_memory;
use petshelf_core::{PetService, SqlitePetStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("petshelf_core ping={}", petshelf_core::ping());
    println!("petshelf_core version={}", petshelf_core::core_version());

    // Exercise the full open -> store -> service path against a throwaway
    // in-memory database.
    let conn = open_db_in_memory()?;
    let store = SqlitePetStore::try_new(&conn)?;
    let service = PetService::new(store);

    let id = service.insert_sample_pet()?;
    println!("petshelf_core sample_pet_id={id}");

    for pet in service.list_pets()? {
        println!(
            "pet id={} name={} breed={} gender={} weight={}",
            pet.id,
            pet.name,
            pet.breed.as_deref().unwrap_or("-"),
            pet.gender.code(),
            pet.weight
        );
    }

    Ok(())
}
