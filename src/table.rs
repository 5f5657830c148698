//! Structural parser for `CREATE TABLE` statements.
//!
//! SQLite's `pragma_table_info` reports names, types, nullability and
//! defaults, but not constraint names, CHECK expressions, collations or
//! AUTOINCREMENT. [`ParsedTableDefinition`] recovers those from the statement
//! text kept in `sqlite_schema`.
//!
//! Parsing is best effort: malformed input yields a partial definition rather
//! than an error.

mod column;
mod constraint;

use alloc::string::String;
use alloc::vec::Vec;

pub use column::{ColumnDefinition, DEFAULT_COLLATION, GeneratedColumn};
pub use constraint::{ForeignKeyAction, TableConstraint};

use crate::cursor::{Cursor, is_name, split_top_level};
use crate::diagnostics::parser_debug;
use crate::token::{Token, TokenKind};
use crate::tokenizer::tokenize;

/// Words that open a table-level constraint item.
const TABLE_CONSTRAINT_INTRODUCERS: &[&str] =
    &["CONSTRAINT", "PRIMARY", "UNIQUE", "FOREIGN", "CHECK"];

/// The result of parsing one `CREATE TABLE` statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedTableDefinition {
    /// Schema qualifier, as in `main.users`.
    pub schema: Option<String>,
    /// Table name with quoting removed.
    pub name: Option<String>,
    /// `CREATE TEMP TABLE` or `CREATE TEMPORARY TABLE`.
    pub temporary: bool,
    /// `IF NOT EXISTS` was present.
    pub if_not_exists: bool,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDefinition>,
    /// Table-level constraints in declaration order. Column-level constraints
    /// live in [`ColumnDefinition::constraints`].
    pub constraints: Vec<TableConstraint>,
    /// `WITHOUT ROWID` table option.
    pub without_rowid: bool,
    /// `STRICT` table option.
    pub strict: bool,
}

impl ParsedTableDefinition {
    /// Tokenize and parse `sql`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_ddl_reflect::{ParsedTableDefinition, TableConstraint};
    ///
    /// let table = ParsedTableDefinition::parse(
    ///     "CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, b TEXT COLLATE NOCASE, \
    ///      UNIQUE (b))",
    /// );
    /// assert_eq!(table.name.as_deref(), Some("t"));
    /// assert!(table.columns[0].is_autoincrement());
    /// assert_eq!(table.columns[1].collation(), "NOCASE");
    /// assert!(matches!(table.constraints[0], TableConstraint::Unique { .. }));
    /// ```
    #[must_use]
    pub fn parse(sql: &str) -> Self {
        Self::from_tokens(tokenize(sql))
    }

    /// Parse an already tokenized statement.
    ///
    /// Tokens after the first `;` are ignored, as are [`TokenKind::None`]
    /// placeholders.
    #[must_use]
    pub fn from_tokens<'a, I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = Token<'a>>,
    {
        let tokens: Vec<Token<'a>> = tokens
            .into_iter()
            .take_while(|t| t.kind != TokenKind::Terminator)
            .filter(|t| t.kind != TokenKind::None)
            .collect();
        let mut cursor = Cursor::new(&tokens);
        let mut table = Self::default();

        cursor.eat_word("CREATE");
        table.temporary = cursor.eat_word("TEMP") || cursor.eat_word("TEMPORARY");
        cursor.eat_word("TABLE");
        table.if_not_exists = cursor.eat_words(&["IF", "NOT", "EXISTS"]);
        (table.schema, table.name) = cursor.eat_qualified_name();

        // Anything up to the column list, such as `AS SELECT ...`, leaves the table empty.
        while !cursor.peek_kind(TokenKind::LParen) {
            if cursor.peek_word("AS") || cursor.advance().is_none() {
                return table;
            }
        }

        if let Some(body) = cursor.parenthesized() {
            for item in split_top_level(body) {
                table.parse_item(item);
            }
        }
        table.parse_options(cursor.remaining());
        table
    }

    fn parse_item(&mut self, item: &[Token<'_>]) {
        let Some(first) = item.first() else {
            return;
        };
        if TABLE_CONSTRAINT_INTRODUCERS.iter().any(|w| first.is_word(w)) {
            match constraint::parse_table_constraint(item) {
                Some(constraint) => self.constraints.push(constraint),
                None => {
                    parser_debug!(first.pos, "skipping unparseable table constraint");
                }
            }
        } else if is_name(first) {
            self.columns.extend(column::parse_column(item));
        } else {
            parser_debug!(first.pos, "skipping table item that is neither column nor constraint");
        }
    }

    fn parse_options(&mut self, tokens: &[Token<'_>]) {
        for option in split_top_level(tokens) {
            let mut cursor = Cursor::new(option);
            if cursor.eat_words(&["WITHOUT", "ROWID"]) {
                self.without_rowid = true;
            } else if cursor.eat_word("STRICT") {
                self.strict = true;
            }
        }
    }

    /// Look a column up by name, ignoring ASCII case as SQLite does.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Names of the primary key columns in key order.
    ///
    /// Column-level PRIMARY KEY clauses take precedence; otherwise the last
    /// table-level PRIMARY KEY constraint is used.
    #[must_use]
    pub fn primary_key_columns(&self) -> Vec<&str> {
        let inline: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| c.is_primary_key())
            .map(|c| c.name.as_str())
            .collect();
        if !inline.is_empty() {
            return inline;
        }
        self.constraints
            .iter()
            .rev()
            .find(|c| matches!(c, TableConstraint::Primary { .. }))
            .map(|c| c.columns().iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// The column declared `PRIMARY KEY AUTOINCREMENT`, if any.
    ///
    /// Both the column form and the table form `PRIMARY KEY (id AUTOINCREMENT)`
    /// are recognized.
    #[must_use]
    pub fn autoincrement_column(&self) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.is_autoincrement()).or_else(|| {
            let key = self.constraints.iter().rev().find_map(|c| match c {
                TableConstraint::Primary {
                    columns,
                    autoincrement: true,
                    ..
                } => columns.first(),
                _ => None,
            })?;
            self.column(key)
        })
    }

    /// Every constraint of the table: column-level ones first, in column
    /// order, followed by the table-level ones.
    pub fn all_constraints(&self) -> impl Iterator<Item = &TableConstraint> {
        self.columns
            .iter()
            .flat_map(|c| c.constraints.iter())
            .chain(self.constraints.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_parse_create_table_simple() {
        let table =
            ParsedTableDefinition::parse("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)");
        assert_eq!(table.name.as_deref(), Some("users"));
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[0].name, "id");
        assert!(table.columns[0].is_primary_key());
        assert_eq!(table.columns[1].name, "name");
        assert!(!table.columns[1].is_primary_key());
        assert_eq!(table.primary_key_columns(), vec!["id"]);
    }

    #[test]
    fn test_parse_create_table_composite_pk() {
        let table = ParsedTableDefinition::parse(
            "CREATE TABLE t (a INT, b INT, c TEXT, PRIMARY KEY (a, b))",
        );
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.primary_key_columns(), vec!["a", "b"]);
    }

    #[test]
    fn test_table_level_autoincrement() {
        let table = ParsedTableDefinition::parse(
            "CREATE TABLE t (id INTEGER, v TEXT, PRIMARY KEY (id AUTOINCREMENT))",
        );
        assert_eq!(table.primary_key_columns(), vec!["id"]);
        assert_eq!(
            table.autoincrement_column().map(|c| c.name.as_str()),
            Some("id")
        );

        let table = ParsedTableDefinition::parse("CREATE TABLE t (id INTEGER, PRIMARY KEY (id))");
        assert!(table.autoincrement_column().is_none());
    }

    #[test]
    fn test_operator_words_as_column_names() {
        let table = ParsedTableDefinition::parse(
            "CREATE TABLE games (id INTEGER PRIMARY KEY, match TEXT, like INT, glob BLOB, regexp)",
        );
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "match", "like", "glob", "regexp"]);
        assert_eq!(table.columns[2].declared_type.as_deref(), Some("INT"));
    }

    #[test]
    fn test_header_variants() {
        let table = ParsedTableDefinition::parse(
            "create temp table if not exists \"main\".[my table] (a)",
        );
        assert!(table.temporary);
        assert!(table.if_not_exists);
        assert_eq!(table.schema.as_deref(), Some("main"));
        assert_eq!(table.name.as_deref(), Some("my table"));
        assert_eq!(table.columns.len(), 1);
    }

    #[test]
    fn test_table_options() {
        let table = ParsedTableDefinition::parse(
            "CREATE TABLE t (a INT PRIMARY KEY) STRICT, WITHOUT ROWID;",
        );
        assert!(table.strict);
        assert!(table.without_rowid);
        let table = ParsedTableDefinition::parse("CREATE TABLE t (a)");
        assert!(!table.strict);
        assert!(!table.without_rowid);
    }

    #[test]
    fn test_create_table_as_select() {
        let table = ParsedTableDefinition::parse("CREATE TABLE t AS SELECT (1) AS a");
        assert_eq!(table.name.as_deref(), Some("t"));
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_malformed_input_is_partial() {
        let table = ParsedTableDefinition::parse("CREATE TABLE t (a INT, b TEXT DEFAULT 'oops");
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[1].default_value, Some(vec![]));

        assert_eq!(ParsedTableDefinition::parse(""), ParsedTableDefinition::default());
        assert!(ParsedTableDefinition::parse("CREATE TABLE").columns.is_empty());
    }

    #[test]
    fn test_statement_after_terminator_ignored() {
        let table = ParsedTableDefinition::parse("CREATE TABLE t (a); CREATE TABLE u (b, c)");
        assert_eq!(table.columns.len(), 1);
    }

    #[test]
    fn test_column_lookup_ignores_case() {
        let table = ParsedTableDefinition::parse("CREATE TABLE t (UserId INTEGER)");
        assert!(table.column("userid").is_some());
        assert!(table.column("other").is_none());
    }

    #[test]
    fn test_all_constraints_order() {
        let table = ParsedTableDefinition::parse(
            "CREATE TABLE t (a INT UNIQUE, b INT CHECK (b > 0), CONSTRAINT pk PRIMARY KEY (a))",
        );
        let names: Vec<Option<&str>> = table.all_constraints().map(TableConstraint::name).collect();
        assert_eq!(names, vec![None, None, Some("pk")]);
    }
}
