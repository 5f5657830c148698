//! Testing utilities comparing parse results against a live SQLite catalog.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`catalog_sql`]: execute DDL in an in-memory database and read back the stored `sql` of
//!   every object
//! - [`table_info`]: the columns SQLite reports for a table through `pragma_table_info`
//! - [`assert_matches_catalog`]: assert that a parsed table agrees with what SQLite reports

extern crate std;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use rusqlite::Connection;

use crate::{ParsedTableDefinition, TableConstraint};

/// One row of `sqlite_schema`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Object type: `table`, `index`, `trigger` or `view`.
    pub kind: String,
    /// Object name.
    pub name: String,
    /// Table the object belongs to.
    pub table: String,
    /// The statement text SQLite stored.
    pub sql: String,
}

/// One row of `pragma_table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Declared type as written, empty when untyped.
    pub declared_type: String,
    /// Whether the column is `NOT NULL`.
    pub not_null: bool,
    /// Default expression text.
    pub default_value: Option<String>,
    /// 1-based position in the primary key, 0 when not part of it.
    pub pk: i64,
}

/// Execute `statements` against a fresh in-memory database and return the
/// catalog rows carrying SQL text, in creation order.
///
/// # Panics
///
/// Panics if SQLite rejects any of the statements.
#[must_use]
pub fn catalog_sql(statements: &[&str]) -> Vec<CatalogEntry> {
    let conn = Connection::open_in_memory().expect("Failed to open in-memory database");
    for &sql in statements {
        conn.execute_batch(sql)
            .unwrap_or_else(|e| panic!("SQLite rejected {sql:?}: {e}"));
    }
    let mut stmt = conn
        .prepare(
            "SELECT type, name, tbl_name, sql FROM sqlite_schema \
             WHERE sql IS NOT NULL ORDER BY rowid",
        )
        .expect("Failed to query sqlite_schema");
    stmt.query_map([], |row| {
        Ok(CatalogEntry {
            kind: row.get(0)?,
            name: row.get(1)?,
            table: row.get(2)?,
            sql: row.get(3)?,
        })
    })
    .and_then(Iterator::collect)
    .expect("Failed to read sqlite_schema")
}

/// The columns of `table` as reported by `pragma_table_info`.
///
/// # Panics
///
/// Panics if the pragma cannot be queried.
#[must_use]
pub fn table_info(conn: &Connection, table: &str) -> Vec<ColumnInfo> {
    let mut stmt = conn
        .prepare(
            "SELECT name, type, \"notnull\", dflt_value, pk \
             FROM pragma_table_info(?1) ORDER BY cid",
        )
        .expect("Failed to query pragma_table_info");
    stmt.query_map([table], |row| {
        Ok(ColumnInfo {
            name: row.get(0)?,
            declared_type: row.get(1)?,
            not_null: row.get(2)?,
            default_value: row.get(3)?,
            pk: row.get(4)?,
        })
    })
    .and_then(Iterator::collect)
    .expect("Failed to read pragma_table_info")
}

/// Column names of each automatic index SQLite created for a UNIQUE constraint.
fn unique_indexes(conn: &Connection, table: &str) -> Vec<Vec<String>> {
    let mut list = conn
        .prepare("SELECT name FROM pragma_index_list(?1) WHERE origin = 'u'")
        .expect("Failed to query pragma_index_list");
    let names: Vec<String> = list
        .query_map([table], |row| row.get(0))
        .and_then(Iterator::collect)
        .expect("Failed to read pragma_index_list");

    let mut info = conn
        .prepare("SELECT name FROM pragma_index_info(?1) ORDER BY seqno")
        .expect("Failed to query pragma_index_info");
    names
        .iter()
        .map(|index| {
            info.query_map([index], |row| row.get(0))
                .and_then(Iterator::collect)
                .expect("Failed to read pragma_index_info")
        })
        .collect()
}

/// Foreign keys of `table` as `(referenced table, local columns)`.
fn foreign_keys(conn: &Connection, table: &str) -> Vec<(String, Vec<String>)> {
    let mut stmt = conn
        .prepare("SELECT id, \"table\", \"from\" FROM pragma_foreign_key_list(?1) ORDER BY id, seq")
        .expect("Failed to query pragma_foreign_key_list");
    let rows: Vec<(i64, String, String)> = stmt
        .query_map([table], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .and_then(Iterator::collect)
        .expect("Failed to read pragma_foreign_key_list");

    let mut grouped: BTreeMap<i64, (String, Vec<String>)> = BTreeMap::new();
    for (id, parent, from) in rows {
        grouped
            .entry(id)
            .or_insert_with(|| (parent, Vec::new()))
            .1
            .push(from);
    }
    grouped.into_values().collect()
}

/// Type text with whitespace removed and ASCII letters uppercased.
fn normalize_type(declared: &str) -> String {
    declared
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Assert that parsing the stored `CREATE TABLE` text of `table` agrees with
/// SQLite's own view of the table.
///
/// Compared: column names and order, declared types with their arguments,
/// nullability, primary key order, UNIQUE indexes and foreign keys.
///
/// # Panics
///
/// Panics on the first disagreement, or if `table` does not exist.
pub fn assert_matches_catalog(conn: &Connection, table: &str) {
    let sql: String = conn
        .query_row(
            "SELECT sql FROM sqlite_schema WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .unwrap_or_else(|e| panic!("Table {table:?} not found: {e}"));
    let parsed = ParsedTableDefinition::parse(&sql);
    let info = table_info(conn, table);

    let parsed_names: Vec<&str> = parsed.columns.iter().map(|c| c.name.as_str()).collect();
    let catalog_names: Vec<&str> = info.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(parsed_names, catalog_names, "Column names differ for {sql}");

    for (column, expected) in parsed.columns.iter().zip(&info) {
        let mut declared = column.declared_type.clone().unwrap_or_default();
        if !column.type_parameters.is_empty() {
            declared = alloc::format!("{declared}({})", column.type_parameters.join(","));
        }
        assert_eq!(
            normalize_type(&declared),
            normalize_type(&expected.declared_type),
            "Declared type differs for column {}",
            column.name
        );
        assert_eq!(
            column.not_null, expected.not_null,
            "NOT NULL differs for column {}",
            column.name
        );
    }

    let mut catalog_pk: Vec<(i64, &str)> = info
        .iter()
        .filter(|c| c.pk > 0)
        .map(|c| (c.pk, c.name.as_str()))
        .collect();
    catalog_pk.sort_unstable();
    let catalog_pk: Vec<&str> = catalog_pk.into_iter().map(|(_, name)| name).collect();
    assert_eq!(
        parsed.primary_key_columns(),
        catalog_pk,
        "Primary key differs for {sql}"
    );

    for columns in unique_indexes(conn, table) {
        assert!(
            parsed.all_constraints().any(|c| {
                matches!(c, TableConstraint::Unique { .. }) && c.has_columns(columns.as_slice())
            }),
            "No UNIQUE constraint on {columns:?} in {sql}"
        );
    }

    for (parent, columns) in foreign_keys(conn, table) {
        assert!(
            parsed.all_constraints().any(|c| match c {
                TableConstraint::Foreign { foreign_table, .. } => {
                    foreign_table.eq_ignore_ascii_case(&parent)
                        && c.has_columns(columns.as_slice())
                }
                _ => false,
            }),
            "No FOREIGN KEY on {columns:?} referencing {parent} in {sql}"
        );
    }
}
