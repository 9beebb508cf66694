//! Pet store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the four scope-routed operations over the `pets` table:
//!   query, insert, update, delete.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate the field set before any SQL mutation.
//! - Item scope always overrides the caller's filter with `id = ?`.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Every operation is stateless per call and runs one statement.

use crate::db::schema::SCHEMA_VERSION;
use crate::db::DbError;
use crate::model::pet::{Gender, Pet, PetId, PetValidationError, PetValues};
use crate::store::address::{AddressParseError, PetAddress};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PETS_TABLE: &str = "pets";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error taxonomy covering addressing, validation, scope and storage.
#[derive(Debug)]
pub enum StoreError {
    /// Address text resolved to neither known shape.
    InvalidAddress(AddressParseError),
    /// Field set violated a pet rule; nothing was written.
    Validation(PetValidationError),
    /// Operation is not defined for the resolved scope.
    UnsupportedOperation {
        operation: &'static str,
        address: PetAddress,
    },
    /// Underlying read/write was rejected by storage.
    Db(DbError),
    /// Connection has no schema version stamped; it was not opened through
    /// the storage gateway.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row failed decoding (e.g. out-of-range gender code).
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAddress(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::UnsupportedOperation { operation, address } => {
                write!(f, "{operation} is not supported for address `{address}`")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through the storage gateway"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted pet data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidAddress(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::UnsupportedOperation { .. }
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<AddressParseError> for StoreError {
    fn from(value: AddressParseError) -> Self {
        Self::InvalidAddress(value)
    }
}

impl From<PetValidationError> for StoreError {
    fn from(value: PetValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Columns of the `pets` table, used for typed projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetColumn {
    Id,
    Name,
    Breed,
    Gender,
    Weight,
}

impl PetColumn {
    /// All columns in canonical order.
    pub const ALL: [PetColumn; 5] = [
        PetColumn::Id,
        PetColumn::Name,
        PetColumn::Breed,
        PetColumn::Gender,
        PetColumn::Weight,
    ];

    /// Column name as it appears in the schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Breed => "breed",
            Self::Gender => "gender",
            Self::Weight => "weight",
        }
    }
}

/// Query options for the collection/item read path.
#[derive(Debug, Clone, Default)]
pub struct PetQuery {
    /// Columns to return; `None` (or an empty list) selects all columns.
    pub projection: Option<Vec<PetColumn>>,
    /// SQL predicate applied in collection scope. Ignored in item scope.
    pub filter: Option<String>,
    /// Positional arguments for `filter` placeholders.
    pub filter_args: Vec<Value>,
    /// Raw `ORDER BY` expression, applied as given.
    pub sort_order: Option<String>,
}

/// One row shaped by the query's projection.
///
/// A field is `None` when its column was not projected, or (for `breed`)
/// when the stored value is NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetRecord {
    pub id: Option<PetId>,
    pub name: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<Gender>,
    pub weight: Option<i64>,
}

impl PetRecord {
    /// Converts a fully-projected record into a [`Pet`].
    ///
    /// Fails with [`StoreError::InvalidData`] when a required column was
    /// not part of the projection.
    pub fn into_pet(self) -> StoreResult<Pet> {
        let Self {
            id,
            name,
            breed,
            gender,
            weight,
        } = self;
        match (id, name, gender, weight) {
            (Some(id), Some(name), Some(gender), Some(weight)) => Ok(Pet {
                id,
                name,
                breed,
                gender,
                weight,
            }),
            _ => Err(StoreError::InvalidData(
                "record is missing required columns; project id, name, gender and weight"
                    .to_string(),
            )),
        }
    }
}

/// Finite, forward-only sequence of query results.
///
/// Consuming the iterator is one-way: once drained it cannot be restarted.
#[derive(Debug)]
pub struct PetRows {
    rows: std::vec::IntoIter<PetRecord>,
}

impl PetRows {
    fn new(records: Vec<PetRecord>) -> Self {
        Self {
            rows: records.into_iter(),
        }
    }

    /// Remaining rows not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    /// Drains the sequence into fully-typed pets.
    ///
    /// Requires the full projection; see [`PetRecord::into_pet`].
    pub fn into_pets(self) -> StoreResult<Vec<Pet>> {
        self.map(PetRecord::into_pet).collect()
    }
}

impl Iterator for PetRows {
    type Item = PetRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for PetRows {}

/// Store contract for the four scope-routed operations.
pub trait PetStore {
    /// Reads rows for the address scope.
    ///
    /// Collection scope runs `request.filter` as given; item scope reads
    /// exactly the addressed row and ignores the filter.
    fn query(&self, address: &PetAddress, request: &PetQuery) -> StoreResult<PetRows>;

    /// Inserts one pet at the collection address and returns its item
    /// address. Item scope fails with [`StoreError::UnsupportedOperation`].
    fn insert(&self, address: &PetAddress, values: &PetValues) -> StoreResult<PetAddress>;

    /// Updates present fields on rows in scope; returns the modified count.
    /// An empty field set is a no-op returning 0.
    fn update(
        &self,
        address: &PetAddress,
        values: &PetValues,
        filter: Option<&str>,
        filter_args: &[Value],
    ) -> StoreResult<usize>;

    /// Deletes rows in scope; returns the deleted count. In collection
    /// scope an absent filter deletes all rows.
    fn delete(
        &self,
        address: &PetAddress,
        filter: Option<&str>,
        filter_args: &[Value],
    ) -> StoreResult<usize>;
}

/// SQLite-backed pet store over an injected connection.
pub struct SqlitePetStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePetStore<'conn> {
    /// Constructs a store from a gateway-opened connection.
    ///
    /// Verifies the schema version stamp, the `pets` table and its columns
    /// before any operation is allowed.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PetStore for SqlitePetStore<'_> {
    fn query(&self, address: &PetAddress, request: &PetQuery) -> StoreResult<PetRows> {
        let projection = effective_projection(request.projection.as_deref());
        let column_list = projection
            .iter()
            .map(PetColumn::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = format!("SELECT {column_list} FROM {PETS_TABLE}");
        let mut bind_values: Vec<Value> = Vec::new();

        match address {
            PetAddress::Collection => {
                if let Some(filter) = request.filter.as_deref() {
                    sql.push_str(" WHERE ");
                    sql.push_str(filter);
                    bind_values.extend(request.filter_args.iter().cloned());
                }
            }
            // Item scope ignores any caller-supplied filter.
            PetAddress::Item(id) => {
                sql.push_str(" WHERE id = ?");
                bind_values.push(Value::Integer(*id));
            }
        }

        if let Some(sort_order) = request.sort_order.as_deref() {
            sql.push_str(" ORDER BY ");
            sql.push_str(sort_order);
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(decode_record(row, &projection)?);
        }

        Ok(PetRows::new(records))
    }

    fn insert(&self, address: &PetAddress, values: &PetValues) -> StoreResult<PetAddress> {
        if let PetAddress::Item(_) = address {
            return Err(StoreError::UnsupportedOperation {
                operation: "insert",
                address: *address,
            });
        }

        values.validate_for_insert()?;

        // Presence of name/gender/weight is guaranteed by validation above.
        let name = values.name.clone().unwrap_or_default();
        let breed = values.breed.clone().flatten();
        let gender = values.gender.unwrap_or_default();
        let weight = values.weight.unwrap_or_default();

        self.conn.execute(
            "INSERT INTO pets (name, breed, gender, weight) VALUES (?1, ?2, ?3, ?4);",
            rusqlite::params![name, breed, gender, weight],
        )?;

        let id = self.conn.last_insert_rowid();
        info!("event=pet_insert module=store status=ok id={id}");
        Ok(PetAddress::Item(id))
    }

    fn update(
        &self,
        address: &PetAddress,
        values: &PetValues,
        filter: Option<&str>,
        filter_args: &[Value],
    ) -> StoreResult<usize> {
        if values.is_empty() {
            return Ok(0);
        }

        values.validate_present()?;

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = &values.name {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(breed) = &values.breed {
            assignments.push("breed = ?");
            bind_values.push(match breed {
                Some(text) => Value::Text(text.clone()),
                None => Value::Null,
            });
        }
        if let Some(gender) = values.gender {
            assignments.push("gender = ?");
            bind_values.push(Value::Integer(gender));
        }
        if let Some(weight) = values.weight {
            assignments.push("weight = ?");
            bind_values.push(Value::Integer(weight));
        }

        let mut sql = format!("UPDATE {PETS_TABLE} SET {}", assignments.join(", "));
        append_scope_filter(&mut sql, &mut bind_values, address, filter, filter_args);

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        info!("event=pet_update module=store status=ok rows={changed}");
        Ok(changed)
    }

    fn delete(
        &self,
        address: &PetAddress,
        filter: Option<&str>,
        filter_args: &[Value],
    ) -> StoreResult<usize> {
        let mut sql = format!("DELETE FROM {PETS_TABLE}");
        let mut bind_values: Vec<Value> = Vec::new();
        append_scope_filter(&mut sql, &mut bind_values, address, filter, filter_args);

        let deleted = self.conn.execute(&sql, params_from_iter(bind_values))?;
        info!("event=pet_delete module=store status=ok rows={deleted}");
        Ok(deleted)
    }
}

/// Appends the WHERE clause for the resolved scope.
///
/// Item scope binds `id = ?` and discards the caller's filter; collection
/// scope appends the filter as given, or nothing (all rows) when absent.
fn append_scope_filter(
    sql: &mut String,
    bind_values: &mut Vec<Value>,
    address: &PetAddress,
    filter: Option<&str>,
    filter_args: &[Value],
) {
    match address {
        PetAddress::Collection => {
            if let Some(filter) = filter {
                sql.push_str(" WHERE ");
                sql.push_str(filter);
                bind_values.extend(filter_args.iter().cloned());
            }
        }
        PetAddress::Item(id) => {
            sql.push_str(" WHERE id = ?");
            bind_values.push(Value::Integer(*id));
        }
    }
}

fn effective_projection(projection: Option<&[PetColumn]>) -> Vec<PetColumn> {
    match projection {
        Some(columns) if !columns.is_empty() => columns.to_vec(),
        _ => PetColumn::ALL.to_vec(),
    }
}

fn decode_record(row: &Row<'_>, projection: &[PetColumn]) -> StoreResult<PetRecord> {
    let mut record = PetRecord::default();
    for (index, column) in projection.iter().enumerate() {
        match column {
            PetColumn::Id => record.id = Some(row.get(index)?),
            PetColumn::Name => record.name = Some(row.get(index)?),
            PetColumn::Breed => record.breed = row.get(index)?,
            PetColumn::Gender => {
                let code: i64 = row.get(index)?;
                let gender = Gender::from_code(code).ok_or_else(|| {
                    StoreError::InvalidData(format!(
                        "invalid gender code `{code}` in pets.gender"
                    ))
                })?;
                record.gender = Some(gender);
            }
            PetColumn::Weight => record.weight = Some(row.get(index)?),
        }
    }
    Ok(record)
}

fn ensure_connection_ready(conn: &Connection) -> StoreResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != SCHEMA_VERSION {
        return Err(StoreError::UninitializedConnection {
            expected_version: SCHEMA_VERSION,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [PETS_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(StoreError::MissingRequiredTable(PETS_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let mut rows = stmt.query([PETS_TABLE])?;
    let mut present = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>(0)?);
    }

    for column in PetColumn::ALL {
        if !present.iter().any(|name| name == column.as_str()) {
            return Err(StoreError::MissingRequiredColumn {
                table: PETS_TABLE,
                column: column.as_str(),
            });
        }
    }

    Ok(())
}
