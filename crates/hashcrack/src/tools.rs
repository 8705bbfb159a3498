//! MCP Tool Types
//!
//! Parameter and response types for every hashcrack MCP tool.

use hashcrack_core::{HashTypeConfig, SessionSnapshot, SessionStatus};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// =============================================================================
// Configuration
// =============================================================================

/// Parameters for crack_config
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ConfigParams {}

/// Response for crack_config
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConfigResponse {
    /// Hash modes that can be requested
    pub hash_types: Vec<HashTypeConfig>,

    /// Hash mode used when crack_start omits one
    pub default_hash_type: u32,

    /// Maximum number of sessions running at once
    pub max_running_sessions: usize,
}

// =============================================================================
// Session Management Tools
// =============================================================================

/// Parameters for crack_start
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CrackStartParams {
    /// Plaintext password to hash and then crack
    pub password: String,

    /// hashcat hash mode (e.g. 0 = MD5, 100 = SHA1). Defaults to the
    /// configured default hash type.
    #[serde(default)]
    pub hash_type: Option<u32>,
}

/// Response for crack_start
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CrackStartResponse {
    /// Unique session identifier
    pub session_id: String,

    /// Hash mode used
    pub hash_type: u32,

    /// Hash being cracked
    pub target_hash: String,

    /// Success message
    pub message: String,
}

/// Parameters for crack_session_get
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionGetParams {
    /// Session ID
    pub session_id: String,
}

/// Parameters for crack_session_list
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SessionListParams {}

/// Response for crack_session_list
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionListResponse {
    /// All sessions, oldest first
    pub sessions: Vec<SessionSnapshot>,

    /// Number of sessions
    pub count: usize,
}

/// Parameters for crack_session_stop
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionStopParams {
    /// Session ID
    pub session_id: String,
}

/// Response for crack_session_stop
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionStopResponse {
    /// Session ID
    pub session_id: String,

    /// Status after the stop request
    pub status: SessionStatus,

    /// Result message
    pub message: String,
}
