use std::{env::current_dir, path::PathBuf};

use miette::{miette, Context, IntoDiagnostic, Result};
use serde_json::Value;


/// File names that are searched for (in this order) when no explicit
/// configuration file path is given.
pub const DEFAULT_CANDIDATE_FILE_NAMES: [&str; 2] = ["settings.toml", "settings.json"];

/// File name the configuration is exported to by default.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "settings.json";

/// Top-level keys starting with this prefix are reserved and never loaded
/// from a settings document.
pub const RESERVED_KEY_PREFIX: &str = "__";

/// Field name the `toml` deserializer uses to smuggle datetimes
/// through self-describing deserializers.
const TOML_DATETIME_FIELD: &str = "$__toml_private_datetime";


/// Returns the default candidate configuration filepaths, which are
/// `{current directory}/settings.toml` and `{current directory}/settings.json`.
pub fn get_default_candidate_file_paths() -> Result<Vec<PathBuf>> {
    let current_directory = current_dir()
        .into_diagnostic()
        .wrap_err_with(|| miette!("Could not get the current directory."))?;

    Ok(DEFAULT_CANDIDATE_FILE_NAMES
        .iter()
        .map(|file_name| current_directory.join(file_name))
        .collect())
}

#[inline]
pub fn is_reserved_key(key: &str) -> bool {
    key.starts_with(RESERVED_KEY_PREFIX)
}

/// Replaces every TOML datetime (which deserializes into a single-field
/// marker object) with its RFC 3339 string, recursively.
pub(crate) fn normalize_toml_datetimes(value: Value) -> Value {
    match value {
        Value::Object(mut fields) => {
            if fields.len() == 1 {
                if let Some(Value::String(datetime)) = fields.get(TOML_DATETIME_FIELD) {
                    return Value::String(datetime.clone());
                }
            }

            for field in fields.values_mut() {
                *field = normalize_toml_datetimes(field.take());
            }

            Value::Object(fields)
        }
        Value::Array(items) => {
            Value::Array(items.into_iter().map(normalize_toml_datetimes).collect())
        }
        other => other,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_candidates_are_toml_then_json() {
        let candidates = get_default_candidate_file_paths().unwrap();

        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].ends_with("settings.toml"));
        assert!(candidates[1].ends_with("settings.json"));
    }

    #[test]
    fn reserved_keys_use_double_underscore() {
        assert!(is_reserved_key("__builtins__"));
        assert!(is_reserved_key("__doc"));
        assert!(!is_reserved_key("_private"));
        assert!(!is_reserved_key("PATH"));
    }

    #[test]
    fn toml_datetimes_become_strings() {
        let value = serde_json::json!({
            "WHEN": { "$__toml_private_datetime": "1979-05-27T07:32:00Z" },
            "SCHEDULE": [{ "$__toml_private_datetime": "07:32:00" }],
            "OTHER": { "a": 1 },
        });

        let normalized = normalize_toml_datetimes(value);

        assert_eq!(
            normalized,
            serde_json::json!({
                "WHEN": "1979-05-27T07:32:00Z",
                "SCHEDULE": ["07:32:00"],
                "OTHER": { "a": 1 },
            })
        );
    }
}
