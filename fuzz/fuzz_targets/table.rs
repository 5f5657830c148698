//! `CREATE TABLE` parser fuzzer.
//!
//! Parsing arbitrary text must never panic, nor may the accessors on the
//! partial result.

use honggfuzz::fuzz;
use sqlite_ddl_reflect::ParsedTableDefinition;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let Ok(input) = std::str::from_utf8(data) else {
                return;
            };
            let table = ParsedTableDefinition::parse(input);
            for constraint in table.all_constraints() {
                let _ = constraint.check_sql();
            }
            let _ = table.primary_key_columns();
        });
    }
}
