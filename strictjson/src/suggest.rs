//! "Did you mean" hints for missing properties.

#[cfg(feature = "suggestions")]
use alloc::format;
use alloc::string::String;

use serde_json::Map;
use serde_json::Value;

use crate::parameter::ParameterMetadata;

/// Find the key in `object` most similar to `missing`, skipping keys that
/// already belong to another parameter.
#[cfg(feature = "suggestions")]
fn closest_key<'a>(
    missing: &str,
    object: &'a Map<String, Value>,
    parameters: &[ParameterMetadata],
) -> Option<&'a str> {
    const SIMILARITY_THRESHOLD: f64 = 0.8;

    let mut best: Option<(&str, f64)> = None;
    for key in object.keys() {
        if parameters.iter().any(|p| p.name() == key) {
            continue;
        }
        let similarity = strsim::jaro_winkler(missing, key);
        if similarity >= SIMILARITY_THRESHOLD
            && best.is_none_or(|(_, best_similarity)| similarity > best_similarity)
        {
            best = Some((key, similarity));
        }
    }
    best.map(|(key, _)| key)
}

/// Suffix for a missing-property message, empty when nothing is close.
#[cfg(feature = "suggestions")]
pub(crate) fn did_you_mean(
    missing: &str,
    object: &Map<String, Value>,
    parameters: &[ParameterMetadata],
) -> String {
    match closest_key(missing, object, parameters) {
        Some(key) => format!(" (did you mean `{key}`?)"),
        None => String::new(),
    }
}

/// Suffix for a missing-property message (always empty without strsim).
#[cfg(not(feature = "suggestions"))]
pub(crate) fn did_you_mean(
    _missing: &str,
    _object: &Map<String, Value>,
    _parameters: &[ParameterMetadata],
) -> String {
    String::new()
}
