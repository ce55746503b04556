//! Isolated context builders for the in-memory and SQLite backends.
//!
//! # Responsibility
//! - Own one transient storage handle per builder.
//! - Hand out fresh contexts that all see the same committed rows.
//!
//! # Invariants
//! - Nothing is shared between builders; dropping a builder discards its data.
//! - `SqliteDbBuilder` keeps its connection open for its whole lifetime, so
//!   the private database survives between `build_context` calls.

use crate::context::{ContextOptions, CourseContext};
use crate::db::{open_db_in_memory, DbResult};
use crate::store::{CatalogStore, MemoryDatabase, MemoryStore, SqliteStore, StoreResult};
use log::debug;
use rusqlite::Connection;

/// Source of fresh persistence contexts over one storage handle.
pub trait ContextBuilder {
    type Store<'a>: CatalogStore
    where
        Self: 'a;

    fn build_context(&self) -> StoreResult<CourseContext<Self::Store<'_>>>;
}

/// Builder over a uniquely named [`MemoryDatabase`].
#[derive(Debug)]
pub struct InMemoryDbBuilder {
    database: MemoryDatabase,
    options: ContextOptions,
}

impl Default for InMemoryDbBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDbBuilder {
    pub fn new() -> Self {
        Self::with_options(ContextOptions::default())
    }

    pub fn with_options(options: ContextOptions) -> Self {
        let database = MemoryDatabase::unique();
        debug!(
            "event=builder_init module=harness status=ok backend=memory name={}",
            database.name()
        );
        Self { database, options }
    }

    pub fn database_name(&self) -> &str {
        self.database.name()
    }
}

impl ContextBuilder for InMemoryDbBuilder {
    type Store<'a> = MemoryStore<'a>;

    fn build_context(&self) -> StoreResult<CourseContext<MemoryStore<'_>>> {
        Ok(CourseContext::new(self.database.store(), &self.options))
    }
}

/// Builder over one private SQLite `:memory:` connection.
#[derive(Debug)]
pub struct SqliteDbBuilder {
    conn: Connection,
    options: ContextOptions,
}

impl SqliteDbBuilder {
    /// Opens the connection and creates the schema.
    pub fn new() -> DbResult<Self> {
        Self::with_options(ContextOptions::default())
    }

    pub fn with_options(options: ContextOptions) -> DbResult<Self> {
        let conn = open_db_in_memory()?;
        debug!("event=builder_init module=harness status=ok backend=sqlite");
        Ok(Self { conn, options })
    }

    /// Wraps an already migrated connection, e.g. a file database.
    pub fn from_connection(conn: Connection, options: ContextOptions) -> Self {
        Self { conn, options }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl ContextBuilder for SqliteDbBuilder {
    type Store<'a> = SqliteStore<'a>;

    fn build_context(&self) -> StoreResult<CourseContext<SqliteStore<'_>>> {
        let store = SqliteStore::try_new(&self.conn)?;
        Ok(CourseContext::new(store, &self.options))
    }
}
