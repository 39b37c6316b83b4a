// --- File: crates/coachreserve_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use url::Url;

/// Default timeout for outbound HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// --- Site Config ---
// The public origin the app is served from. OAuth and email confirmation
// links redirect back here.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    pub origin: String, // e.g. "https://coachreserve.example"
}

impl SiteConfig {
    /// The redirect target handed to the auth provider: the origin root.
    pub fn redirect_url(&self) -> String {
        format!("{}/", self.origin.trim_end_matches('/'))
    }
}

// --- Supabase Config ---
// Project URL is plain config, the anon key usually comes from
// COACHRESERVE_SECRET_SUPABASE_ANON_KEY through a "secret_from_env" marker.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SupabaseConfig {
    pub url: String,      // e.g. "https://xyzcompany.supabase.co"
    pub anon_key: String, // Mandatory
}

// --- HTTP Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String, // trace | debug | info | warn | error
    #[serde(default = "default_log_directory")]
    pub directory: String, // where the terminal shell writes its rolling log
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Site and Supabase sections are mandatory
    pub site: SiteConfig,
    pub supabase: SupabaseConfig,

    // --- Optional sections, defaulted when absent ---
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Checks the values serde cannot: URL shapes and the presence of the anon key.
    pub fn validate(&self) -> Result<(), String> {
        if !is_http_url(&self.supabase.url) {
            return Err(format!(
                "supabase.url must be an http(s) URL, got '{}'",
                self.supabase.url
            ));
        }
        if !is_http_url(&self.site.origin) {
            return Err(format!(
                "site.origin must be an http(s) URL, got '{}'",
                self.site.origin
            ));
        }
        let anon_key = self.supabase.anon_key.trim();
        if anon_key.is_empty() || anon_key == crate::env_vars::SECRET_MARKER {
            return Err("supabase.anon_key is missing".to_string());
        }
        if self.http.timeout_secs == 0 {
            return Err("http.timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}
