//! Fuzzing target for document rewriting
//!
//! Any input must come back either as a rewritten document that is still
//! valid JSON, or as an empty output with a parse error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;
use unitconv_core::{ErrorKind, JsonConverter};

const DEFINITIONS: &str = include_str!("../../tests/fixtures/converter.yml");

fn converter() -> &'static JsonConverter {
    static CONVERTER: OnceLock<JsonConverter> = OnceLock::new();
    CONVERTER.get_or_init(|| JsonConverter::from_yaml_str(DEFINITIONS).unwrap())
}

fuzz_target!(|data: &[u8]| {
    let document = String::from_utf8_lossy(data);
    let (output, errors) = converter()
        .convert_to_preferred_units(&document)
        .into_parts();

    if output.is_empty() {
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), ErrorKind::DocumentParse);
        return;
    }

    serde_json::from_str::<serde_json::Value>(&output)
        .expect("rewritten output must stay valid JSON");
});
