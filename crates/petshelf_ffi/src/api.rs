//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level pet CRUD functions to Dart via FRB.
//! - Keep error semantics simple for the UI: every failure is an envelope
//!   with `ok=false` and a displayable message.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Long-running reads belong off the UI thread; these calls block.

use petshelf_core::db::open_db;
use petshelf_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Pet, PetAddress, PetService, PetStore, PetValues, SqlitePetStore, StoreError,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "petshelf.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One pet row in FFI-friendly shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetItem {
    pub id: i64,
    pub name: String,
    pub breed: Option<String>,
    /// Gender code: 0 unknown, 1 male, 2 female.
    pub gender: i64,
    pub weight: i64,
}

/// Action envelope for create-style calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the created pet on success.
    pub pet_id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl PetActionResponse {
    fn success(message: impl Into<String>, pet_id: i64) -> Self {
        Self {
            ok: true,
            pet_id: Some(pet_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            pet_id: None,
            message: message.into(),
        }
    }
}

/// Mutation envelope for update/delete-style calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetMutationResponse {
    pub ok: bool,
    /// Rows affected on success.
    pub rows: u32,
    pub message: String,
}

impl PetMutationResponse {
    fn success(message: impl Into<String>, rows: usize) -> Self {
        Self {
            ok: true,
            rows: rows as u32,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            rows: 0,
            message: message.into(),
        }
    }
}

/// List envelope for catalog reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetListResponse {
    /// Pets in catalog order (empty on failure).
    pub items: Vec<PetItem>,
    pub message: String,
}

/// Detail envelope for editor reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetDetailResponse {
    /// The addressed pet, or `None` when no row matches.
    pub item: Option<PetItem>,
    pub message: String,
}

/// Adds a pet from the editor flow.
///
/// The raw gender code goes through store validation unchanged, so the UI
/// gets the same message for out-of-range input as any other caller.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Validation failures return `ok=false` with a displayable message.
#[flutter_rust_bridge::frb(sync)]
pub fn add_pet(name: String, breed: Option<String>, gender: i64, weight: i64) -> PetActionResponse {
    let values = PetValues {
        name: Some(name.trim().to_string()),
        breed: Some(normalize_breed(breed)),
        gender: Some(gender),
        weight: Some(weight),
    };
    match with_pet_store(|store| store.insert(&PetAddress::Collection, &values)) {
        Ok(PetAddress::Item(pet_id)) => PetActionResponse::success("Pet saved.", pet_id),
        Ok(PetAddress::Collection) => {
            PetActionResponse::failure("add_pet failed: insert returned a collection address")
        }
        Err(err) => PetActionResponse::failure(format!("add_pet failed: {err}")),
    }
}

/// Inserts the built-in sample pet (catalog demo action).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn insert_sample_pet() -> PetActionResponse {
    match with_pet_service(|service| service.insert_sample_pet()) {
        Ok(pet_id) => PetActionResponse::success("Sample pet saved.", pet_id),
        Err(err) => PetActionResponse::failure(format!("insert_sample_pet failed: {err}")),
    }
}

/// Reads one pet for the editor flow.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Missing row is `item=None` with `ok` semantics left to the message.
#[flutter_rust_bridge::frb(sync)]
pub fn get_pet(id: i64) -> PetDetailResponse {
    match with_pet_service(|service| service.get_pet(id)) {
        Ok(Some(pet)) => PetDetailResponse {
            item: Some(to_pet_item(pet)),
            message: "Found.".to_string(),
        },
        Ok(None) => PetDetailResponse {
            item: None,
            message: "No pet with that id.".to_string(),
        },
        Err(err) => PetDetailResponse {
            item: None,
            message: format!("get_pet failed: {err}"),
        },
    }
}

/// Lists all pets for the catalog flow.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns an empty list with a diagnostic message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn list_pets() -> PetListResponse {
    match with_pet_service(|service| service.list_pets()) {
        Ok(pets) => {
            let items = pets.into_iter().map(to_pet_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No pets yet.".to_string()
            } else {
                format!("Found {} pet(s).", items.len())
            };
            PetListResponse { items, message }
        }
        Err(err) => PetListResponse {
            items: Vec::new(),
            message: format!("list_pets failed: {err}"),
        },
    }
}

/// Updates present fields of one pet from the editor flow.
///
/// Absent (`None`) arguments leave the stored field untouched; `breed`
/// cannot be cleared to NULL over this surface.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - `rows` is 0 when no pet matches the id.
#[flutter_rust_bridge::frb(sync)]
pub fn update_pet(
    id: i64,
    name: Option<String>,
    breed: Option<String>,
    gender: Option<i64>,
    weight: Option<i64>,
) -> PetMutationResponse {
    let values = PetValues {
        name: name.map(|value| value.trim().to_string()),
        breed: breed.map(|value| Some(value.trim().to_string())),
        gender,
        weight,
    };
    match with_pet_service(|service| service.update_pet(id, &values)) {
        Ok(rows) => PetMutationResponse::success("Pet updated.", rows),
        Err(err) => PetMutationResponse::failure(format!("update_pet failed: {err}")),
    }
}

/// Deletes one pet by id.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_pet(id: i64) -> PetMutationResponse {
    match with_pet_service(|service| service.delete_pet(id)) {
        Ok(rows) => PetMutationResponse::success("Pet deleted.", rows),
        Err(err) => PetMutationResponse::failure(format!("delete_pet failed: {err}")),
    }
}

/// Deletes every pet (catalog "delete all" action).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_all_pets() -> PetMutationResponse {
    match with_pet_service(|service| service.delete_all_pets()) {
        Ok(rows) => PetMutationResponse::success(format!("Deleted {rows} pet(s)."), rows),
        Err(err) => PetMutationResponse::failure(format!("delete_all_pets failed: {err}")),
    }
}

fn normalize_breed(breed: Option<String>) -> Option<String> {
    breed.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("PETSHELF_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_pet_store<T>(
    f: impl FnOnce(&SqlitePetStore<'_>) -> Result<T, StoreError>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("pet DB open failed: {err}"))?;
    let store = SqlitePetStore::try_new(&conn)
        .map_err(|err| format!("pet store init failed: {err}"))?;
    f(&store).map_err(|err| err.to_string())
}

fn with_pet_service<T>(
    f: impl FnOnce(&PetService<SqlitePetStore<'_>>) -> Result<T, StoreError>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("pet DB open failed: {err}"))?;
    let store = SqlitePetStore::try_new(&conn)
        .map_err(|err| format!("pet store init failed: {err}"))?;
    let service = PetService::new(store);
    f(&service).map_err(|err| err.to_string())
}

fn to_pet_item(pet: Pet) -> PetItem {
    PetItem {
        id: pet.id,
        name: pet.name,
        breed: pet.breed,
        gender: pet.gender.code(),
        weight: pet.weight,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        add_pet, core_version, delete_pet, get_pet, init_logging, list_pets, ping, update_pet,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn add_pet_round_trips_through_list_and_detail() {
        let name = unique_token("ffi-add");
        let created = add_pet(name.clone(), Some("Pomeranian".to_string()), 1, 4);
        assert!(created.ok, "{}", created.message);
        let pet_id = created.pet_id.expect("created pet should return pet_id");

        let listed = list_pets();
        assert!(
            listed.items.iter().any(|item| item.id == pet_id),
            "{}",
            listed.message
        );

        let detail = get_pet(pet_id);
        let item = detail.item.expect("created pet should be readable");
        assert_eq!(item.name, name);
        assert_eq!(item.breed.as_deref(), Some("Pomeranian"));
        assert_eq!(item.gender, 1);
        assert_eq!(item.weight, 4);
    }

    #[test]
    fn add_pet_rejects_blank_name() {
        let response = add_pet("   ".to_string(), None, 1, 4);
        assert!(!response.ok);
        assert!(response.message.contains("name"), "{}", response.message);
    }

    #[test]
    fn add_pet_rejects_out_of_range_gender() {
        let response = add_pet(unique_token("ffi-gender"), None, 5, 4);
        assert!(!response.ok);
        assert!(response.message.contains("gender"), "{}", response.message);
    }

    #[test]
    fn update_and_delete_affect_only_the_addressed_pet() {
        let name = unique_token("ffi-update");
        let created = add_pet(name, None, 2, 6);
        assert!(created.ok, "{}", created.message);
        let pet_id = created.pet_id.expect("created pet should return pet_id");

        let renamed = unique_token("ffi-renamed");
        let updated = update_pet(pet_id, Some(renamed.clone()), None, None, Some(9));
        assert!(updated.ok, "{}", updated.message);
        assert_eq!(updated.rows, 1);

        let detail = get_pet(pet_id);
        let item = detail.item.expect("updated pet should be readable");
        assert_eq!(item.name, renamed);
        assert_eq!(item.weight, 9);
        assert_eq!(item.gender, 2);

        let deleted = delete_pet(pet_id);
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.rows, 1);

        let second = delete_pet(pet_id);
        assert!(second.ok, "{}", second.message);
        assert_eq!(second.rows, 0);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
