//! Table and column constraints.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::cursor::{Cursor, column_names, owned};
use crate::token::{Token, join_tokens};

/// A PRIMARY KEY, UNIQUE, FOREIGN KEY or CHECK constraint.
///
/// Column-level constraints are normalized into the same shape as table-level
/// ones: a column-level `UNIQUE` becomes `Unique { columns: [that column] }`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableConstraint {
    /// PRIMARY KEY constraint.
    Primary {
        /// Name given with `CONSTRAINT <name>`.
        name: Option<String>,
        /// Key columns in declaration order.
        columns: Vec<String>,
        /// Whether `AUTOINCREMENT` followed the key.
        autoincrement: bool,
    },
    /// UNIQUE constraint.
    Unique {
        /// Name given with `CONSTRAINT <name>`.
        name: Option<String>,
        /// Constrained columns in declaration order.
        columns: Vec<String>,
    },
    /// FOREIGN KEY constraint, or a column-level `REFERENCES` clause.
    Foreign {
        /// Name given with `CONSTRAINT <name>`.
        name: Option<String>,
        /// Referencing columns in this table.
        columns: Vec<String>,
        /// The referenced table.
        foreign_table: String,
        /// Referenced columns; `None` means the primary key of `foreign_table`.
        foreign_columns: Option<Vec<String>>,
        /// `ON DELETE` action.
        on_delete: Option<ForeignKeyAction>,
        /// `ON UPDATE` action.
        on_update: Option<ForeignKeyAction>,
        /// `DEFERRABLE INITIALLY DEFERRED`.
        deferred: bool,
    },
    /// CHECK constraint.
    Check {
        /// Name given with `CONSTRAINT <name>`.
        name: Option<String>,
        /// Tokens between the parentheses of `CHECK (...)`.
        expression: Vec<Token<'static>>,
    },
}

/// Action taken on the referencing rows when a referenced key changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForeignKeyAction {
    /// `SET NULL`
    SetNull,
    /// `SET DEFAULT`
    SetDefault,
    /// `CASCADE`
    Cascade,
    /// `RESTRICT`
    Restrict,
    /// `NO ACTION`
    NoAction,
}

impl ForeignKeyAction {
    /// The SQL spelling of the action.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            ForeignKeyAction::SetNull => "SET NULL",
            ForeignKeyAction::SetDefault => "SET DEFAULT",
            ForeignKeyAction::Cascade => "CASCADE",
            ForeignKeyAction::Restrict => "RESTRICT",
            ForeignKeyAction::NoAction => "NO ACTION",
        }
    }

    fn eat(cursor: &mut Cursor<'_, '_>) -> Option<Self> {
        if cursor.eat_words(&["SET", "NULL"]) {
            Some(ForeignKeyAction::SetNull)
        } else if cursor.eat_words(&["SET", "DEFAULT"]) {
            Some(ForeignKeyAction::SetDefault)
        } else if cursor.eat_word("CASCADE") {
            Some(ForeignKeyAction::Cascade)
        } else if cursor.eat_word("RESTRICT") {
            Some(ForeignKeyAction::Restrict)
        } else if cursor.eat_words(&["NO", "ACTION"]) {
            Some(ForeignKeyAction::NoAction)
        } else {
            None
        }
    }
}

impl TableConstraint {
    /// The constraint name, if one was declared.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            TableConstraint::Primary { name, .. }
            | TableConstraint::Unique { name, .. }
            | TableConstraint::Foreign { name, .. }
            | TableConstraint::Check { name, .. } => name.as_deref(),
        }
    }

    /// The local columns the constraint covers. Empty for CHECK.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        match self {
            TableConstraint::Primary { columns, .. }
            | TableConstraint::Unique { columns, .. }
            | TableConstraint::Foreign { columns, .. } => columns,
            TableConstraint::Check { .. } => &[],
        }
    }

    /// Whether the constraint covers exactly `columns`, ignoring order and
    /// ASCII case.
    ///
    /// This is how a constraint is matched against an index or foreign key
    /// reported by the catalog.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_ddl_reflect::ParsedTableDefinition;
    ///
    /// let table = ParsedTableDefinition::parse("CREATE TABLE t (a, b, UNIQUE (b, a))");
    /// assert!(table.constraints[0].has_columns(&["A", "B"]));
    /// assert!(!table.constraints[0].has_columns(&["a"]));
    /// ```
    #[must_use]
    pub fn has_columns<S: AsRef<str>>(&self, columns: &[S]) -> bool {
        let ours: HashSet<String> = self
            .columns()
            .iter()
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let theirs: HashSet<String> = columns
            .iter()
            .map(|c| c.as_ref().to_ascii_lowercase())
            .collect();
        !ours.is_empty() && ours == theirs
    }

    /// The CHECK expression rendered with single spaces between tokens.
    #[must_use]
    pub fn check_sql(&self) -> Option<String> {
        match self {
            TableConstraint::Check { expression, .. } => Some(join_tokens(expression)),
            _ => None,
        }
    }
}

/// Skip `ON CONFLICT <resolution>`.
pub(super) fn skip_conflict_clause(cursor: &mut Cursor<'_, '_>) {
    if cursor.eat_words(&["ON", "CONFLICT"]) {
        cursor.advance();
    }
}

/// Parse a table-level constraint item, the text between two top-level commas.
pub(super) fn parse_table_constraint(item: &[Token<'_>]) -> Option<TableConstraint> {
    let mut cursor = Cursor::new(item);
    let name = if cursor.eat_word("CONSTRAINT") {
        cursor.eat_name()
    } else {
        None
    };

    if cursor.eat_words(&["PRIMARY", "KEY"]) {
        let mut group = cursor.parenthesized()?;
        // `PRIMARY KEY (id AUTOINCREMENT)` keeps the keyword inside the group.
        let autoincrement = match group {
            [rest @ .., last] if last.is_word("AUTOINCREMENT") => {
                group = rest;
                true
            }
            _ => false,
        };
        let columns = column_names(group);
        skip_conflict_clause(&mut cursor);
        Some(TableConstraint::Primary {
            name,
            columns,
            autoincrement,
        })
    } else if cursor.eat_word("UNIQUE") {
        let columns = column_names(cursor.parenthesized()?);
        Some(TableConstraint::Unique { name, columns })
    } else if cursor.eat_word("CHECK") {
        let expression = owned(cursor.parenthesized()?);
        Some(TableConstraint::Check { name, expression })
    } else if cursor.eat_words(&["FOREIGN", "KEY"]) {
        let columns = column_names(cursor.parenthesized()?);
        if !cursor.eat_word("REFERENCES") {
            return None;
        }
        parse_references(&mut cursor, name, columns)
    } else {
        None
    }
}

/// Parse the clause after `REFERENCES`.
pub(super) fn parse_references(
    cursor: &mut Cursor<'_, '_>,
    name: Option<String>,
    columns: Vec<String>,
) -> Option<TableConstraint> {
    let foreign_table = cursor.eat_name()?;
    let foreign_columns = cursor.parenthesized().map(column_names);
    let mut on_delete = None;
    let mut on_update = None;
    let mut deferred = false;

    loop {
        if cursor.eat_words(&["ON", "DELETE"]) {
            on_delete = ForeignKeyAction::eat(cursor);
        } else if cursor.eat_words(&["ON", "UPDATE"]) {
            on_update = ForeignKeyAction::eat(cursor);
        } else if cursor.eat_word("MATCH") {
            cursor.advance();
        } else if cursor.eat_words(&["NOT", "DEFERRABLE"]) {
            deferred = false;
            if cursor.eat_word("INITIALLY") {
                cursor.advance();
            }
        } else if cursor.eat_word("DEFERRABLE") {
            deferred = cursor.eat_words(&["INITIALLY", "DEFERRED"]);
            if !deferred {
                cursor.eat_words(&["INITIALLY", "IMMEDIATE"]);
            }
        } else {
            break;
        }
    }

    Some(TableConstraint::Foreign {
        name,
        columns,
        foreign_table,
        foreign_columns,
        on_delete,
        on_update,
        deferred,
    })
}

/// A constraint applying to the single column `column`.
pub(super) fn single_column(column: &str) -> Vec<String> {
    vec![String::from(column)]
}
