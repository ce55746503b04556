mod common;

use course_manager_core::db::migrations::latest_version;
use course_manager_core::db::open_db;
use course_manager_core::{
    AuthorRepository, ContextAuthorRepository, ContextBuilder, ContextOptions, SqliteDbBuilder,
    SqliteStore, StoreError,
};
use rusqlite::Connection;

fn builder() -> SqliteDbBuilder {
    SqliteDbBuilder::new().unwrap()
}

#[test]
fn get_authors_second_page_returns_second_page() {
    common::get_authors_second_page_returns_second_page(builder());
}

#[test]
fn get_authors_page_lengths_follow_total() {
    common::get_authors_page_lengths_follow_total(builder());
}

#[test]
fn get_authors_far_past_end_is_empty() {
    common::get_authors_far_past_end_is_empty(builder());
}

#[test]
fn get_authors_zero_arguments_are_invalid() {
    common::get_authors_zero_arguments_are_invalid(builder());
}

#[test]
fn get_author_nil_id_is_invalid_argument() {
    common::get_author_nil_id_is_invalid_argument(builder());
}

#[test]
fn get_author_unknown_id_returns_none() {
    common::get_author_unknown_id_returns_none(builder());
}

#[test]
fn get_author_is_idempotent() {
    common::get_author_is_idempotent(builder());
}

#[test]
fn add_author_without_country_defaults_to_be() {
    common::add_author_without_country_defaults_to_be(builder());
}

#[test]
fn add_author_is_invisible_until_saved() {
    common::add_author_is_invisible_until_saved(builder());
}

#[test]
fn add_author_blank_last_name_is_rejected() {
    common::add_author_blank_last_name_is_rejected(builder());
}

#[test]
fn save_changes_unknown_country_is_persistence_error() {
    common::save_changes_unknown_country_is_persistence_error(builder());
}

#[test]
fn save_changes_failure_is_atomic() {
    common::save_changes_failure_is_atomic(builder());
}

#[test]
fn save_changes_duplicate_author_id_is_rejected() {
    common::save_changes_duplicate_author_id_is_rejected(builder());
}

#[test]
fn save_changes_duplicate_country_is_rejected() {
    common::save_changes_duplicate_country_is_rejected(builder());
}

#[test]
fn countries_are_ordered_by_code() {
    common::countries_are_ordered_by_code(builder());
}

#[test]
fn builders_never_share_rows() {
    let first = builder();
    let second = builder();

    common::seed_catalog(&first);

    let context = second.build_context().unwrap();
    assert_eq!(context.count_authors().unwrap(), 0);
}

#[test]
fn file_database_keeps_rows_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("course_manager.db");

    {
        let builder =
            SqliteDbBuilder::from_connection(open_db(&path).unwrap(), ContextOptions::default());
        common::seed_catalog(&builder);
    }

    let builder =
        SqliteDbBuilder::from_connection(open_db(&path).unwrap(), ContextOptions::default());
    let mut context = builder.build_context().unwrap();
    let target = ContextAuthorRepository::new(&mut context);
    let page = target.get_authors(2, 3).unwrap();
    let names: Vec<_> = page.iter().map(|author| author.last_name.as_str()).collect();
    assert_eq!(names, vec!["Wildermuth", "Kurata"]);
}

#[test]
fn store_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteStore::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_missing_authors_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE countries (id TEXT PRIMARY KEY NOT NULL, description TEXT NOT NULL);
         CREATE TABLE authors (
            id TEXT PRIMARY KEY NOT NULL,
            last_name TEXT NOT NULL,
            country_id TEXT NOT NULL
         );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteStore::try_new(&conn),
        Err(StoreError::MissingRequiredColumn {
            table: "authors",
            column: "seq"
        })
    ));
}

#[test]
fn foreign_keys_are_enforced_on_raw_inserts() {
    let builder = builder();
    let result = builder.connection().execute(
        "INSERT INTO authors (id, last_name, country_id) VALUES ('x', 'Nobody', 'ZZ');",
        [],
    );
    assert!(result.is_err());
}
