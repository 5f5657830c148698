//! Parse results survive a JSON round trip.

#![cfg(feature = "serde")]

use sqlite_ddl_reflect::{ParsedTableDefinition, ParsedTriggerDefinition};

#[test]
fn test_table_json_round_trip() {
    let table = ParsedTableDefinition::parse(
        "CREATE TABLE t (id INTEGER PRIMARY KEY, v TEXT DEFAULT 'x' CHECK (length(v) < 10))",
    );
    let json = serde_json::to_string(&table).unwrap();
    let back: ParsedTableDefinition = serde_json::from_str(&json).unwrap();
    assert_eq!(back, table);
}

#[test]
fn test_trigger_json_round_trip() {
    let trigger = ParsedTriggerDefinition::parse(
        "CREATE TRIGGER tr BEFORE INSERT ON t WHEN new.id > 0 BEGIN SELECT 1; END",
    )
    .unwrap();
    let json = serde_json::to_string(&trigger).unwrap();
    let back: ParsedTriggerDefinition = serde_json::from_str(&json).unwrap();
    assert_eq!(back, trigger);
}
