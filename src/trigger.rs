//! Structural parser for `CREATE TRIGGER` statements.
//!
//! SQLite keeps no structured record of when a trigger fires; the timing and
//! events only exist in the statement text.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};

use crate::cursor::{Cursor, column_names, owned};
use crate::diagnostics::parser_debug;
use crate::errors::Error;
use crate::token::{Token, TokenKind};
use crate::tokenizer::tokenize;

/// When a trigger fires relative to the triggering statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerTiming {
    /// `BEFORE`, also what SQLite uses when no timing is written.
    #[default]
    Before,
    /// `AFTER`
    After,
    /// `INSTEAD OF`
    InsteadOf,
}

impl Display for TriggerTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TriggerTiming::Before => "BEFORE",
            TriggerTiming::After => "AFTER",
            TriggerTiming::InsteadOf => "INSTEAD OF",
        })
    }
}

/// A statement kind that can fire a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerEvent {
    /// `INSERT`
    Insert,
    /// `UPDATE`
    Update,
    /// `DELETE`
    Delete,
}

impl TriggerEvent {
    const ALL: [TriggerEvent; 3] = [
        TriggerEvent::Insert,
        TriggerEvent::Update,
        TriggerEvent::Delete,
    ];

    fn bit(self) -> u8 {
        match self {
            TriggerEvent::Insert => 0b001,
            TriggerEvent::Update => 0b010,
            TriggerEvent::Delete => 0b100,
        }
    }
}

impl Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TriggerEvent::Insert => "INSERT",
            TriggerEvent::Update => "UPDATE",
            TriggerEvent::Delete => "DELETE",
        })
    }
}

/// Set of [`TriggerEvent`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerEvents(u8);

impl TriggerEvents {
    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Add `event` to the set.
    pub fn insert(&mut self, event: TriggerEvent) {
        self.0 |= event.bit();
    }

    /// Whether `event` is in the set.
    #[must_use]
    pub fn contains(self, event: TriggerEvent) -> bool {
        self.0 & event.bit() != 0
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of events in the set.
    #[must_use]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Events in the set, in `INSERT`, `UPDATE`, `DELETE` order.
    pub fn iter(self) -> impl Iterator<Item = TriggerEvent> {
        TriggerEvent::ALL.into_iter().filter(move |e| self.contains(*e))
    }
}

impl FromIterator<TriggerEvent> for TriggerEvents {
    fn from_iter<I: IntoIterator<Item = TriggerEvent>>(iter: I) -> Self {
        let mut events = Self::empty();
        for event in iter {
            events.insert(event);
        }
        events
    }
}

impl<const N: usize> From<[TriggerEvent; N]> for TriggerEvents {
    fn from(events: [TriggerEvent; N]) -> Self {
        events.into_iter().collect()
    }
}

/// The result of parsing one `CREATE TRIGGER` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedTriggerDefinition {
    /// Schema qualifier of the trigger name.
    pub schema: Option<String>,
    /// Trigger name with quoting removed.
    pub name: Option<String>,
    /// `CREATE TEMP TRIGGER`.
    pub temporary: bool,
    /// `IF NOT EXISTS` was present.
    pub if_not_exists: bool,
    /// When the trigger fires.
    pub timing: TriggerTiming,
    /// The statements that fire it. Never empty.
    pub events: TriggerEvents,
    /// Columns listed in `UPDATE OF`.
    pub update_columns: Vec<String>,
    /// The table or view the trigger is attached to.
    pub table: Option<String>,
    /// `FOR EACH ROW` was written. SQLite triggers are always row triggers.
    pub for_each_row: bool,
    /// Tokens of the `WHEN` condition.
    pub when: Option<Vec<Token<'static>>>,
}

impl ParsedTriggerDefinition {
    /// Tokenize and parse `sql`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTriggerEvent`] if no `INSERT`, `UPDATE` or
    /// `DELETE` event follows the trigger name.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlite_ddl_reflect::{ParsedTriggerDefinition, TriggerEvent, TriggerTiming};
    ///
    /// let trigger = ParsedTriggerDefinition::parse(
    ///     "CREATE TRIGGER audit AFTER UPDATE OF email ON users BEGIN SELECT 1; END",
    /// )?;
    /// assert_eq!(trigger.timing, TriggerTiming::After);
    /// assert!(trigger.events.contains(TriggerEvent::Update));
    /// assert_eq!(trigger.update_columns, ["email"]);
    /// assert_eq!(trigger.table.as_deref(), Some("users"));
    /// # Ok::<(), sqlite_ddl_reflect::Error>(())
    /// ```
    pub fn parse(sql: &str) -> Result<Self, Error> {
        Self::from_tokens(tokenize(sql))
    }

    /// Parse an already tokenized statement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTriggerEvent`] if no event keyword is found.
    pub fn from_tokens<'a, I>(tokens: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = Token<'a>>,
    {
        let tokens: Vec<Token<'a>> = tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::None)
            .collect();
        let mut cursor = Cursor::new(&tokens);

        cursor.eat_word("CREATE");
        let temporary = cursor.eat_word("TEMP") || cursor.eat_word("TEMPORARY");
        cursor.eat_word("TRIGGER");
        let if_not_exists = cursor.eat_words(&["IF", "NOT", "EXISTS"]);
        let (schema, name) = cursor.eat_qualified_name();

        let timing = if cursor.eat_word("BEFORE") {
            TriggerTiming::Before
        } else if cursor.eat_word("AFTER") {
            TriggerTiming::After
        } else if cursor.eat_words(&["INSTEAD", "OF"]) {
            TriggerTiming::InsteadOf
        } else {
            TriggerTiming::default()
        };

        let mut events = TriggerEvents::empty();
        let mut update_columns = Vec::new();
        loop {
            if cursor.eat_word("INSERT") {
                events.insert(TriggerEvent::Insert);
            } else if cursor.eat_word("DELETE") {
                events.insert(TriggerEvent::Delete);
            } else if cursor.eat_word("UPDATE") {
                events.insert(TriggerEvent::Update);
                if cursor.eat_word("OF") {
                    update_columns.extend(column_names(update_of_list(&mut cursor)));
                }
            } else {
                break;
            }
            if !cursor.eat_word("OR") {
                break;
            }
        }

        if events.is_empty() {
            let pos = cursor
                .peek()
                .or(tokens.last())
                .map_or(0, |t| t.pos);
            parser_debug!(pos, "trigger definition has no event");
            return Err(Error::MissingTriggerEvent { pos });
        }

        let table = if cursor.eat_word("ON") {
            let (_, table) = cursor.eat_qualified_name();
            table
        } else {
            None
        };
        let for_each_row = cursor.eat_words(&["FOR", "EACH", "ROW"]);
        let when = cursor
            .eat_word("WHEN")
            .then(|| owned(cursor.take_until_word("BEGIN")));

        Ok(Self {
            schema,
            name,
            temporary,
            if_not_exists,
            timing,
            events,
            update_columns,
            table,
            for_each_row,
            when,
        })
    }
}

/// The column list after `UPDATE OF`, which runs up to `ON` or the next `OR`.
fn update_of_list<'t, 'a>(cursor: &mut Cursor<'t, 'a>) -> &'t [Token<'a>] {
    let remaining = cursor.remaining();
    let mut len = 0;
    while let Some(token) = remaining.get(len) {
        if token.is_word("ON") || token.is_word("OR") {
            break;
        }
        len += 1;
    }
    for _ in 0..len {
        cursor.advance();
    }
    &remaining[..len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::join_tokens;

    #[test]
    fn test_after_insert() {
        let trigger =
            ParsedTriggerDefinition::parse("CREATE TRIGGER t AFTER INSERT ON x BEGIN SELECT 1; END")
                .unwrap();
        assert_eq!(trigger.name.as_deref(), Some("t"));
        assert_eq!(trigger.timing, TriggerTiming::After);
        assert_eq!(trigger.events, TriggerEvents::from([TriggerEvent::Insert]));
        assert_eq!(trigger.table.as_deref(), Some("x"));
    }

    #[test]
    fn test_multiple_events() {
        let trigger = ParsedTriggerDefinition::parse(
            "CREATE TRIGGER t BEFORE UPDATE OR DELETE ON x BEGIN END",
        )
        .unwrap();
        assert_eq!(trigger.timing, TriggerTiming::Before);
        assert_eq!(
            trigger.events,
            TriggerEvents::from([TriggerEvent::Update, TriggerEvent::Delete])
        );
        assert_eq!(trigger.events.len(), 2);
        assert!(!trigger.events.contains(TriggerEvent::Insert));
    }

    #[test]
    fn test_default_timing_is_before() {
        let trigger =
            ParsedTriggerDefinition::parse("CREATE TRIGGER t DELETE ON x BEGIN END").unwrap();
        assert_eq!(trigger.timing, TriggerTiming::Before);
    }

    #[test]
    fn test_instead_of() {
        let trigger = ParsedTriggerDefinition::parse(
            "CREATE TEMP TRIGGER IF NOT EXISTS main.v_ins INSTEAD OF INSERT ON v \
             FOR EACH ROW BEGIN END",
        )
        .unwrap();
        assert!(trigger.temporary);
        assert!(trigger.if_not_exists);
        assert_eq!(trigger.schema.as_deref(), Some("main"));
        assert_eq!(trigger.name.as_deref(), Some("v_ins"));
        assert_eq!(trigger.timing, TriggerTiming::InsteadOf);
        assert!(trigger.for_each_row);
    }

    #[test]
    fn test_update_of_columns_and_when() {
        let trigger = ParsedTriggerDefinition::parse(
            "CREATE TRIGGER t AFTER UPDATE OF a, \"B\" ON x WHEN new.a > old.a BEGIN SELECT 1; END",
        )
        .unwrap();
        assert_eq!(trigger.update_columns, ["a", "B"]);
        assert_eq!(join_tokens(&trigger.when.unwrap()), "new . a > old . a");
    }

    #[test]
    fn test_missing_event_fails() {
        let err =
            ParsedTriggerDefinition::parse("CREATE TRIGGER t AFTER ON x BEGIN END").unwrap_err();
        assert_eq!(err, Error::MissingTriggerEvent { pos: 23 });
        assert!(ParsedTriggerDefinition::parse("").is_err());
        assert!(ParsedTriggerDefinition::parse("CREATE TABLE t (a)").is_err());
    }

    #[test]
    fn test_events_iter_order() {
        let events = TriggerEvents::from([TriggerEvent::Delete, TriggerEvent::Insert]);
        let listed: Vec<TriggerEvent> = events.iter().collect();
        assert_eq!(listed, [TriggerEvent::Insert, TriggerEvent::Delete]);
    }
}
