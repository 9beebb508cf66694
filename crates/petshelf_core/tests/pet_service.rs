use petshelf_core::db::open_db_in_memory;
use petshelf_core::{Gender, PetService, PetValues, SqlitePetStore};

#[test]
fn add_and_get_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let service = PetService::new(SqlitePetStore::try_new(&conn).unwrap());

    let id = service
        .add_pet("Tommy", Some("Pomeranian".to_string()), Gender::Male, 4)
        .unwrap();
    assert_eq!(id, 1);

    let pet = service.get_pet(id).unwrap().unwrap();
    assert_eq!(pet.name, "Tommy");
    assert_eq!(pet.breed.as_deref(), Some("Pomeranian"));
    assert_eq!(pet.gender, Gender::Male);
    assert_eq!(pet.weight, 4);

    assert!(service.get_pet(999).unwrap().is_none());
}

#[test]
fn list_pets_returns_catalog_order() {
    let conn = open_db_in_memory().unwrap();
    let service = PetService::new(SqlitePetStore::try_new(&conn).unwrap());

    for name in ["Bella", "Argo", "Cora"] {
        service.add_pet(name, None, Gender::Unknown, 1).unwrap();
    }

    let names: Vec<_> = service
        .list_pets()
        .unwrap()
        .into_iter()
        .map(|pet| pet.name)
        .collect();
    assert_eq!(
        names,
        vec!["Argo".to_string(), "Bella".to_string(), "Cora".to_string()]
    );
}

#[test]
fn sample_pet_matches_the_catalog_demo_entry() {
    let conn = open_db_in_memory().unwrap();
    let service = PetService::new(SqlitePetStore::try_new(&conn).unwrap());

    let id = service.insert_sample_pet().unwrap();
    let pet = service.get_pet(id).unwrap().unwrap();
    assert_eq!(pet.name, "Toto");
    assert_eq!(pet.breed.as_deref(), Some("Terrier"));
    assert_eq!(pet.gender, Gender::Male);
    assert_eq!(pet.weight, 7);
}

#[test]
fn update_pet_changes_only_present_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = PetService::new(SqlitePetStore::try_new(&conn).unwrap());

    let id = service
        .add_pet("Tommy", Some("Pomeranian".to_string()), Gender::Male, 4)
        .unwrap();

    let weight_only = PetValues {
        weight: Some(6),
        ..PetValues::default()
    };
    assert_eq!(service.update_pet(id, &weight_only).unwrap(), 1);

    let pet = service.get_pet(id).unwrap().unwrap();
    assert_eq!(pet.name, "Tommy");
    assert_eq!(pet.breed.as_deref(), Some("Pomeranian"));
    assert_eq!(pet.weight, 6);

    // Missing row updates nothing.
    assert_eq!(service.update_pet(999, &weight_only).unwrap(), 0);
}

#[test]
fn delete_pet_and_delete_all_report_counts() {
    let conn = open_db_in_memory().unwrap();
    let service = PetService::new(SqlitePetStore::try_new(&conn).unwrap());

    let id = service.add_pet("Solo", None, Gender::Female, 2).unwrap();
    assert_eq!(service.delete_pet(id).unwrap(), 1);
    assert_eq!(service.delete_pet(id).unwrap(), 0);

    for name in ["a", "b", "c"] {
        service.add_pet(name, None, Gender::Unknown, 1).unwrap();
    }
    assert_eq!(service.delete_all_pets().unwrap(), 3);
    assert!(service.list_pets().unwrap().is_empty());
}
