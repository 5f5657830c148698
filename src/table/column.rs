//! Column definitions.

use alloc::string::String;
use alloc::vec::Vec;

use super::constraint::{TableConstraint, parse_references, single_column, skip_conflict_clause};
use crate::cursor::{Cursor, owned, split_top_level};
use crate::diagnostics::parser_debug;
use crate::token::{Token, TokenKind, join_tokens};

/// Collation SQLite applies to a column without a COLLATE clause.
pub const DEFAULT_COLLATION: &str = "BINARY";

/// One column of a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnDefinition {
    /// Column name with quoting removed.
    pub name: String,
    /// Declared type, `None` when the column has no type.
    pub declared_type: Option<String>,
    /// Arguments of the type, e.g. `["10", "2"]` for `DECIMAL(10,2)`.
    pub type_parameters: Vec<String>,
    /// PRIMARY KEY, UNIQUE, CHECK and REFERENCES clauses in declaration order.
    pub constraints: Vec<TableConstraint>,
    /// Whether `NOT NULL` was declared.
    pub not_null: bool,
    /// Tokens of the DEFAULT clause; a parenthesised default keeps only the
    /// tokens inside the parentheses.
    pub default_value: Option<Vec<Token<'static>>>,
    /// Collation named by the last COLLATE clause.
    pub explicit_collation: Option<String>,
    /// Generated column expression.
    pub generated: Option<GeneratedColumn>,
}

/// `GENERATED ALWAYS AS (expr) [STORED | VIRTUAL]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratedColumn {
    /// Tokens between the parentheses.
    pub expression: Vec<Token<'static>>,
    /// `STORED`; SQLite defaults to `VIRTUAL`.
    pub stored: bool,
}

impl ColumnDefinition {
    fn new(name: String) -> Self {
        Self {
            name,
            declared_type: None,
            type_parameters: Vec::new(),
            constraints: Vec::new(),
            not_null: false,
            default_value: None,
            explicit_collation: None,
            generated: None,
        }
    }

    /// Whether the column carries a PRIMARY KEY clause.
    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.primary_key().is_some()
    }

    /// Whether the column's PRIMARY KEY clause includes `AUTOINCREMENT`.
    ///
    /// When several PRIMARY KEY clauses are present the last one decides.
    #[must_use]
    pub fn is_autoincrement(&self) -> bool {
        matches!(
            self.primary_key(),
            Some(TableConstraint::Primary {
                autoincrement: true,
                ..
            })
        )
    }

    /// The column's collation, [`DEFAULT_COLLATION`] when none was declared.
    #[must_use]
    pub fn collation(&self) -> &str {
        self.explicit_collation
            .as_deref()
            .unwrap_or(DEFAULT_COLLATION)
    }

    /// The DEFAULT clause rendered with single spaces between tokens.
    #[must_use]
    pub fn default_sql(&self) -> Option<String> {
        self.default_value.as_deref().map(join_tokens)
    }

    fn primary_key(&self) -> Option<&TableConstraint> {
        self.constraints
            .iter()
            .rev()
            .find(|c| matches!(c, TableConstraint::Primary { .. }))
    }
}

/// Parse a column item, the text between two top-level commas.
pub(super) fn parse_column(item: &[Token<'_>]) -> Option<ColumnDefinition> {
    let mut cursor = Cursor::new(item);
    let mut column = ColumnDefinition::new(cursor.eat_name()?);
    parse_type(&mut cursor, &mut column);

    let mut constraint_name = None;
    while let Some(token) = cursor.peek() {
        if cursor.eat_word("CONSTRAINT") {
            constraint_name = cursor.eat_name();
            continue;
        }

        let name = constraint_name.take();
        if cursor.eat_words(&["PRIMARY", "KEY"]) {
            let _ = cursor.eat_word("ASC") || cursor.eat_word("DESC");
            skip_conflict_clause(&mut cursor);
            let autoincrement = cursor.eat_word("AUTOINCREMENT");
            column.constraints.push(TableConstraint::Primary {
                name,
                columns: single_column(&column.name),
                autoincrement,
            });
        } else if cursor.eat_words(&["NOT", "NULL"]) {
            skip_conflict_clause(&mut cursor);
            column.not_null = true;
        } else if cursor.eat_word("NULL") {
            skip_conflict_clause(&mut cursor);
            column.not_null = false;
        } else if cursor.eat_word("UNIQUE") {
            skip_conflict_clause(&mut cursor);
            column.constraints.push(TableConstraint::Unique {
                name,
                columns: single_column(&column.name),
            });
        } else if cursor.eat_word("CHECK") {
            let expression = owned(cursor.parenthesized().unwrap_or_default());
            column
                .constraints
                .push(TableConstraint::Check { name, expression });
        } else if cursor.eat_word("DEFAULT") {
            column.default_value = Some(owned(default_tokens(&mut cursor)));
        } else if cursor.eat_word("COLLATE") {
            if let Some(collation) = cursor.eat_name() {
                column.explicit_collation = Some(collation);
            }
        } else if cursor.eat_word("REFERENCES") {
            if let Some(foreign) =
                parse_references(&mut cursor, name, single_column(&column.name))
            {
                column.constraints.push(foreign);
            }
        } else if cursor.eat_words(&["GENERATED", "ALWAYS", "AS"]) || cursor.eat_word("AS") {
            let expression = owned(cursor.parenthesized().unwrap_or_default());
            let stored = cursor.eat_word("STORED");
            if !stored {
                cursor.eat_word("VIRTUAL");
            }
            column.generated = Some(GeneratedColumn { expression, stored });
        } else {
            parser_debug!(token.pos, "skipping unexpected token in column definition");
            cursor.advance();
        }
    }

    Some(column)
}

/// Consume the type name and its parenthesised arguments, if present.
///
/// Any run of type-name and identifier tokens forms the type, so names outside
/// the built-in catalog (`UUID`, `INT UNSIGNED`) are kept too.
fn parse_type(cursor: &mut Cursor<'_, '_>, column: &mut ColumnDefinition) {
    let mut words: Vec<&str> = Vec::new();
    while let Some(token) = cursor
        .peek()
        .filter(|t| matches!(t.kind, TokenKind::Type | TokenKind::Identifier))
    {
        words.push(&token.text);
        cursor.advance();
    }
    if words.is_empty() {
        return;
    }
    column.declared_type = Some(words.join(" "));

    if let Some(arguments) = cursor.parenthesized() {
        column.type_parameters = split_top_level(arguments)
            .into_iter()
            .map(join_tokens)
            .collect();
    }
}

/// Tokens making up a DEFAULT value: a parenthesised expression, a signed
/// number, or a single literal or identifier.
fn default_tokens<'t, 'a>(cursor: &mut Cursor<'t, 'a>) -> &'t [Token<'a>] {
    if let Some(expression) = cursor.parenthesized() {
        return expression;
    }
    let remaining = cursor.remaining();
    let len = match remaining {
        [sign, _, ..] if sign.kind == TokenKind::Operator && matches!(&*sign.text, "+" | "-") => 2,
        [_, ..] => 1,
        [] => 0,
    };
    for _ in 0..len {
        cursor.advance();
    }
    &remaining[..len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;
    use alloc::vec;

    fn parse(item: &str) -> ColumnDefinition {
        let tokens: Vec<Token<'_>> = tokenize(item).collect();
        parse_column(&tokens).unwrap()
    }

    #[test]
    fn test_name_and_type() {
        let column = parse("\"user id\" INTEGER");
        assert_eq!(column.name, "user id");
        assert_eq!(column.declared_type.as_deref(), Some("INTEGER"));
        assert!(column.constraints.is_empty());
        assert_eq!(column.collation(), DEFAULT_COLLATION);
    }

    #[test]
    fn test_untyped_column() {
        let column = parse("a NOT NULL");
        assert_eq!(column.declared_type, None);
        assert!(column.not_null);
    }

    #[test]
    fn test_type_parameters() {
        let column = parse("price DECIMAL(10, 2) NOT NULL");
        assert_eq!(column.declared_type.as_deref(), Some("DECIMAL"));
        assert_eq!(column.type_parameters, ["10", "2"]);
        assert!(column.not_null);
    }

    #[test]
    fn test_custom_multi_word_type() {
        let column = parse("n INT UNSIGNED");
        assert_eq!(column.declared_type.as_deref(), Some("INT UNSIGNED"));
        let column = parse("id uuid PRIMARY KEY");
        assert_eq!(column.declared_type.as_deref(), Some("uuid"));
        assert!(column.is_primary_key());
    }

    #[test]
    fn test_autoincrement() {
        let column = parse("id INTEGER PRIMARY KEY AUTOINCREMENT");
        assert!(column.is_autoincrement());
        let column = parse("id INTEGER PRIMARY KEY DESC ON CONFLICT FAIL AUTOINCREMENT");
        assert!(column.is_autoincrement());
        let column = parse("id INTEGER PRIMARY KEY");
        assert!(column.is_primary_key());
        assert!(!column.is_autoincrement());
    }

    #[test]
    fn test_named_column_constraints() {
        let column =
            parse("email TEXT CONSTRAINT uq_email UNIQUE CONSTRAINT ck CHECK (length(email) > 3)");
        assert_eq!(column.constraints.len(), 2);
        assert_eq!(column.constraints[0].name(), Some("uq_email"));
        assert_eq!(column.constraints[0].columns(), ["email"]);
        assert_eq!(column.constraints[1].name(), Some("ck"));
        assert_eq!(
            column.constraints[1].check_sql().as_deref(),
            Some("length ( email ) > 3")
        );
    }

    #[test]
    fn test_constraint_name_does_not_leak() {
        let column = parse("a INT CONSTRAINT nn NOT NULL UNIQUE");
        assert_eq!(column.constraints[0].name(), None);
    }

    #[test]
    fn test_nullability_last_wins() {
        assert!(!parse("a INT NOT NULL NULL").not_null);
        assert!(parse("a INT NULL NOT NULL").not_null);
        assert!(parse("a INT NOT NULL NOT NULL").not_null);
    }

    #[test]
    fn test_repeated_primary_key_last_decides_autoincrement() {
        let column = parse("id INTEGER PRIMARY KEY PRIMARY KEY AUTOINCREMENT");
        assert_eq!(column.constraints.len(), 2);
        assert!(column.is_autoincrement());
        let column = parse("id INTEGER PRIMARY KEY AUTOINCREMENT PRIMARY KEY");
        assert!(column.is_primary_key());
        assert!(!column.is_autoincrement());
    }

    #[test]
    fn test_collation_last_wins() {
        let column = parse("name TEXT COLLATE NOCASE COLLATE rtrim");
        assert_eq!(column.collation(), "rtrim");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(parse("a INT DEFAULT 0").default_sql().as_deref(), Some("0"));
        assert_eq!(parse("a INT DEFAULT -1 NOT NULL").default_sql().as_deref(), Some("- 1"));
        assert_eq!(
            parse("a TEXT DEFAULT 'it''s'").default_value.unwrap()[0].value(),
            "it's"
        );
        assert_eq!(
            parse("a TEXT DEFAULT (datetime('now'))").default_sql().as_deref(),
            Some("datetime ( 'now' )")
        );
        assert_eq!(
            parse("a TEXT DEFAULT CURRENT_TIMESTAMP").default_sql().as_deref(),
            Some("CURRENT_TIMESTAMP")
        );
    }

    #[test]
    fn test_references() {
        let column = parse("owner INTEGER REFERENCES users(id) ON DELETE CASCADE NOT NULL");
        assert!(column.not_null);
        assert_eq!(
            column.constraints,
            vec![TableConstraint::Foreign {
                name: None,
                columns: vec!["owner".into()],
                foreign_table: "users".into(),
                foreign_columns: Some(vec!["id".into()]),
                on_delete: Some(crate::ForeignKeyAction::Cascade),
                on_update: None,
                deferred: false,
            }]
        );
    }

    #[test]
    fn test_generated() {
        let column = parse("total REAL GENERATED ALWAYS AS (price * qty) STORED");
        let generated = column.generated.unwrap();
        assert!(generated.stored);
        assert_eq!(join_tokens(&generated.expression), "price * qty");

        let column = parse("upper_name TEXT AS (upper(name))");
        assert!(!column.generated.unwrap().stored);
    }

    #[test]
    fn test_keyword_named_column() {
        let column = parse("key TEXT");
        assert_eq!(column.name, "key");
        let column = parse("date DATE");
        assert_eq!(column.name, "date");
        assert_eq!(column.declared_type.as_deref(), Some("DATE"));
    }
}
