//! Unit-of-work persistence context.
//!
//! # Responsibility
//! - Stage country/author inserts until `save_changes`.
//! - Forward committed-state queries to the underlying store.
//! - Emit `save_changes` events to `log` and the optional context sink.
//!
//! # Invariants
//! - Staged rows are never visible to queries, in this or any other context.
//! - A failed save keeps the staged set; a successful one clears it.

use crate::logging::LogSink;
use crate::model::author::{Author, AuthorId, AuthorValidationError};
use crate::model::country::{Country, CountryValidationError};
use crate::store::{AuthorListQuery, CatalogStore, ChangeSet, StoreResult};
use log::{error, info, Level};
use std::time::Instant;
use uuid::Uuid;

/// Explicit per-context configuration.
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    log_sink: Option<LogSink>,
}

impl ContextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes context events to `sink` in addition to the `log` facade.
    pub fn with_log_sink(mut self, sink: LogSink) -> Self {
        self.log_sink = Some(sink);
        self
    }

    pub fn log_sink(&self) -> Option<&LogSink> {
        self.log_sink.as_ref()
    }
}

/// Persistence context over one [`CatalogStore`].
#[derive(Debug)]
pub struct CourseContext<S: CatalogStore> {
    store: S,
    pending: ChangeSet,
    log_sink: Option<LogSink>,
}

impl<S: CatalogStore> CourseContext<S> {
    pub fn new(store: S, options: &ContextOptions) -> Self {
        Self {
            store,
            pending: ChangeSet::default(),
            log_sink: options.log_sink().cloned(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and stages one country insert.
    pub fn add_country(&mut self, country: Country) -> Result<(), CountryValidationError> {
        country.validate()?;
        self.pending.countries.push(country);
        Ok(())
    }

    /// Validates and stages one author insert.
    ///
    /// A nil `id` is replaced with a generated one; the staged id is returned.
    pub fn add_author(&mut self, mut author: Author) -> Result<AuthorId, AuthorValidationError> {
        if author.id.is_nil() {
            author.id = Uuid::new_v4();
        }
        author.validate()?;
        let id = author.id;
        self.pending.authors.push(author);
        Ok(id)
    }

    pub fn countries(&self) -> StoreResult<Vec<Country>> {
        self.store.list_countries()
    }

    pub fn find_country(&self, id: &str) -> StoreResult<Option<Country>> {
        self.store.find_country(id)
    }

    pub fn authors(&self, query: &AuthorListQuery) -> StoreResult<Vec<Author>> {
        self.store.list_authors(query)
    }

    pub fn find_author(&self, id: AuthorId) -> StoreResult<Option<Author>> {
        self.store.find_author(id)
    }

    pub fn count_authors(&self) -> StoreResult<u64> {
        self.store.count_authors()
    }

    pub fn pending_changes(&self) -> &ChangeSet {
        &self.pending
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drops every staged row without touching the store.
    pub fn discard_changes(&mut self) {
        self.pending.clear();
    }

    /// Commits staged rows atomically and returns how many were written.
    pub fn save_changes(&mut self) -> StoreResult<usize> {
        if self.pending.is_empty() {
            return Ok(0);
        }

        let started_at = Instant::now();
        let backend = self.store.backend();
        let rows = self.pending.len();

        match self.store.commit(&self.pending) {
            Ok(()) => {
                self.pending.clear();
                info!(
                    "event=save_changes module=context status=ok backend={backend} rows={rows} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                self.emit(
                    Level::Info,
                    format_args!("saved {rows} row(s) to {backend} store"),
                );
                Ok(rows)
            }
            Err(err) => {
                error!(
                    "event=save_changes module=context status=error backend={backend} rows={rows} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                self.emit(
                    Level::Error,
                    format_args!("failed to save {rows} row(s) to {backend} store: {err}"),
                );
                Err(err)
            }
        }
    }

    fn emit(&self, level: Level, message: std::fmt::Arguments<'_>) {
        if let Some(sink) = &self.log_sink {
            sink.emit(level, message);
        }
    }
}
