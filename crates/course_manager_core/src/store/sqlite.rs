//! SQLite catalog store.
//!
//! # Responsibility
//! - Map the store contract onto the `countries`/`authors` tables.
//! - Translate SQLite constraint failures into [`ConstraintViolation`].
//!
//! # Invariants
//! - Author listing order is `seq ASC`, never physical row order.
//! - Commits run in one immediate transaction; any failed insert rolls the
//!   whole change set back.

use super::{
    AuthorListQuery, CatalogStore, ChangeSet, ConstraintViolation, StoreError, StoreResult,
};
use crate::db::migrations::latest_version;
use crate::model::author::{Author, AuthorId};
use crate::model::country::Country;
use rusqlite::types::Value;
use rusqlite::{ffi, params, params_from_iter, Connection, OptionalExtension, Row};
use rusqlite::{Transaction, TransactionBehavior};
use uuid::Uuid;

const AUTHOR_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    country_id
FROM authors";

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("countries", &["id", "description"]),
    ("authors", &["seq", "id", "first_name", "last_name", "country_id"]),
];

/// [`CatalogStore`] over a borrowed, migrated SQLite connection.
#[derive(Debug, Clone, Copy)]
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Wraps a connection after checking its catalog schema.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_catalog_connection_ready(conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }
}

impl CatalogStore for SqliteStore<'_> {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn list_countries(&self) -> StoreResult<Vec<Country>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, description FROM countries ORDER BY id ASC;")?;
        let countries = stmt
            .query_map([], parse_country_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(countries)
    }

    fn find_country(&self, id: &str) -> StoreResult<Option<Country>> {
        let country = self
            .conn
            .query_row(
                "SELECT id, description FROM countries WHERE id = ?1;",
                [id],
                parse_country_row,
            )
            .optional()?;
        Ok(country)
    }

    fn list_authors(&self, query: &AuthorListQuery) -> StoreResult<Vec<Author>> {
        let mut sql = format!("{AUTHOR_SELECT_SQL} ORDER BY seq ASC");
        let mut bind_values: Vec<Value> = Vec::new();

        // SQLite integers are i64; larger offsets skip every row anyway.
        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);
        match query.limit {
            Some(limit) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                bind_values.push(Value::Integer(i64::from(limit)));
            }
            None => sql.push_str(" LIMIT -1 OFFSET ?"),
        }
        bind_values.push(Value::Integer(offset));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(parse_author_row(row)?);
        }
        Ok(authors)
    }

    fn find_author(&self, id: AuthorId) -> StoreResult<Option<Author>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_author_row(row)?));
        }
        Ok(None)
    }

    fn count_authors(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM authors;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| StoreError::InvalidData(format!("negative author count `{count}`")))
    }

    fn commit(&self, changes: &ChangeSet) -> StoreResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        for country in &changes.countries {
            tx.execute(
                "INSERT INTO countries (id, description) VALUES (?1, ?2);",
                params![country.id.as_str(), country.description.as_str()],
            )
            .map_err(|err| map_write_error(err, "countries"))?;
        }

        for author in &changes.authors {
            tx.execute(
                "INSERT INTO authors (id, first_name, last_name, country_id)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    author.id.to_string(),
                    author.first_name.as_deref(),
                    author.last_name.as_str(),
                    author.country_id.as_str(),
                ],
            )
            .map_err(|err| map_write_error(err, "authors"))?;
        }

        tx.commit()?;
        Ok(())
    }
}

fn map_write_error(err: rusqlite::Error, table: &'static str) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                return StoreError::Constraint(ConstraintViolation::ForeignKey { table });
            }
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                return StoreError::Constraint(ConstraintViolation::DuplicateKey { table });
            }
            _ => {}
        }
    }
    StoreError::from(err)
}

fn parse_country_row(row: &Row<'_>) -> rusqlite::Result<Country> {
    Ok(Country {
        id: row.get("id")?,
        description: row.get("description")?,
    })
}

fn parse_author_row(row: &Row<'_>) -> StoreResult<Author> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{id_text}` in authors.id"))
    })?;

    Ok(Author {
        id,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        country_id: row.get("country_id")?,
    })
}

fn ensure_catalog_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(StoreError::MissingRequiredTable(table));
        }
        for column in columns.iter().copied() {
            if !table_has_column(conn, table, column)? {
                return Err(StoreError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
