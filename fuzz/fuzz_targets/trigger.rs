//! `CREATE TRIGGER` parser fuzzer.
//!
//! Parsing arbitrary text must never panic, and a successful parse always
//! carries at least one event.

use honggfuzz::fuzz;
use sqlite_ddl_reflect::ParsedTriggerDefinition;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let Ok(input) = std::str::from_utf8(data) else {
                return;
            };
            if let Ok(trigger) = ParsedTriggerDefinition::parse(input) {
                assert!(!trigger.events.is_empty());
            }
        });
    }
}
