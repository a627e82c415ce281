//! Shared proptest strategies for unit tests.

use proptest::prelude::*;

use crate::IdentifierValue;

/// Strategy: non-empty, session-id-like scope strings.
pub(crate) fn arb_scope() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9-]{1,24}").unwrap()
}

/// Strategy: a single identifier value of one of several common id types.
pub(crate) fn arb_identifier_value() -> impl Strategy<Value = IdentifierValue> {
    prop_oneof![
        any::<i32>().prop_map(IdentifierValue::new),
        any::<u64>().prop_map(IdentifierValue::new),
        prop::string::string_regex("[a-z0-9-]{0,16}")
            .unwrap()
            .prop_map(IdentifierValue::new),
    ]
}

/// Strategy: one to five identifier values.
pub(crate) fn arb_identifier_values() -> impl Strategy<Value = Vec<IdentifierValue>> {
    prop::collection::vec(arb_identifier_value(), 1..=5)
}
