//! Environment variable handling for the CoachReserve application.
//!
//! Configuration values can be overridden with `COACHRESERVE__SECTION__KEY`
//! variables (picked up by the `config` crate). Secrets are referenced in the
//! config files with the `"secret_from_env"` marker and resolved here from
//! `COACHRESERVE_SECRET_SECTION_KEY`, falling back to the legacy
//! `SECTION_KEY` form.

use std::env;
use tracing::warn;

/// The prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "COACHRESERVE";

/// The prefix for secret environment variables
pub const SECRET_PREFIX: &str = "COACHRESERVE_SECRET";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// The separator for secret environment variables
pub const SECRET_SEPARATOR: &str = "_";

/// Placeholder string in config files for values that must come from the environment
pub const SECRET_MARKER: &str = "secret_from_env";

/// Convert a configuration path to an environment variable name
///
/// # Arguments
///
/// * `path` - The configuration path (e.g., "site.origin")
///
/// # Returns
///
/// The environment variable name (e.g., "COACHRESERVE__SITE__ORIGIN")
pub fn config_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", DEFAULT_PREFIX, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to an environment variable name
///
/// # Arguments
///
/// * `path` - The secret path (e.g., "supabase.anon_key")
///
/// # Returns
///
/// The environment variable name (e.g., "COACHRESERVE_SECRET_SUPABASE_ANON_KEY")
pub fn secret_path_to_env_var(path: &str) -> String {
    let path = path.replace('.', SECRET_SEPARATOR);
    format!("{}{}{}", SECRET_PREFIX, SECRET_SEPARATOR, path).to_uppercase()
}

/// Convert a secret path to its legacy, unprefixed variable name
/// (e.g., "supabase.anon_key" becomes "SUPABASE_ANON_KEY").
pub fn legacy_secret_path_to_env_var(path: &str) -> String {
    let parts: Vec<&str> = path.split('.').collect();
    if parts.len() < 2 {
        return path.to_uppercase();
    }

    let section = parts[0];
    let key = parts[1..].join(SECRET_SEPARATOR);
    format!("{}_{}", section, key).to_uppercase()
}

/// Get an environment variable for a configuration path
pub fn get_config_env_var(path: &str) -> Option<String> {
    env::var(config_path_to_env_var(path)).ok()
}

/// Get an environment variable for a secret path
///
/// Tries the prefixed name first, then the legacy one.
pub fn get_secret_env_var(path: &str) -> Option<String> {
    if let Ok(value) = env::var(secret_path_to_env_var(path)) {
        return Some(value);
    }

    env::var(legacy_secret_path_to_env_var(path)).ok()
}

/// Check if a path is a secret path
///
/// Paths containing "secret", "key", "password" or "token" are considered secret.
pub fn is_secret_path(path: &str) -> bool {
    let path_lower = path.to_lowercase();
    path_lower.contains("secret")
        || path_lower.contains("key")
        || path_lower.contains("password")
        || path_lower.contains("token")
}

/// Get an environment variable for a path, using the secret naming scheme for secret paths
pub fn get_env_var(path: &str) -> Option<String> {
    if is_secret_path(path) {
        get_secret_env_var(path)
    } else {
        get_config_env_var(path)
    }
}

/// Inject environment variables into a JSON value
///
/// Walks the value recursively and replaces every `"secret_from_env"` string
/// with the environment value for its dotted path.
///
/// # Returns
///
/// `true` if any values were replaced, `false` otherwise
pub fn inject_env_vars(value: &mut serde_json::Value) -> bool {
    use serde_json::Value;

    fn walk(path: Vec<String>, obj: &mut Value) -> bool {
        let mut replaced = false;

        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    replaced |= walk(new_path, v);
                }
            }
            Value::Array(arr) => {
                for (i, v) in arr.iter_mut().enumerate() {
                    let mut new_path = path.clone();
                    new_path.push(i.to_string());
                    replaced |= walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_MARKER => {
                let path_str = path.join(".");
                if let Some(env_val) = get_env_var(&path_str) {
                    *s = env_val;
                    replaced = true;
                } else {
                    warn!("env var for {} not found", path_str);
                }
            }
            _ => {}
        }

        replaced
    }

    walk(vec![], value)
}
