use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Scan profile used for every backend call
    #[serde(default)]
    pub profile: ScanProfile,

    /// Enable debug logging to a file
    #[serde(default)]
    pub debug: bool,

    /// Override the debug log file path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_log_path: Option<String>,

    /// How many session log files to keep
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_log_keep: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: ScanProfile::default(),
            debug: false,
            debug_log_path: None,
            debug_log_keep: None,
        }
    }
}

/// One backend configuration. The API key deliberately does not live here:
/// it is read from the environment by the binary and injected explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProfile {
    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Optional custom API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Operation scope label embedded into the persona string
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Registered requesting-agent identity, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_identity: Option<String>,
}

impl Default for ScanProfile {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: None,
            scope: default_scope(),
            agent_identity: None,
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_scope() -> String {
    "communication-network discovery".to_string()
}
