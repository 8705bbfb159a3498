//! hashcrack MCP Server Implementation
//!
//! This module implements the MCP server using rmcp 0.9's #[tool_router] pattern.
//! Tool calls are routed to the session manager; every handler answers
//! immediately and never waits on a cracking process.

use std::str::FromStr;
use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use hashcrack_core::{DigestHasher, Error, ServerConfig, SessionId, SessionSnapshot};
use hashcrack_launcher::HashcatLauncher;
use hashcrack_session::SessionManager;

use crate::tools::*;

const INVALID_PARAMS: ErrorCode = ErrorCode(-32602);
const INTERNAL_ERROR: ErrorCode = ErrorCode(-32603);

/// Map a core error onto an MCP error.
///
/// Problems with the request itself (unknown session, bad id, unsupported
/// hash mode) are invalid params; everything else is internal.
fn to_mcp_error(e: Error) -> McpError {
    let code = match &e {
        Error::SessionNotFound(_) | Error::InvalidSessionId(_) | Error::UnsupportedAlgorithm(_) => {
            INVALID_PARAMS
        }
        _ => INTERNAL_ERROR,
    };
    McpError::new(code, e.to_string(), None)
}

fn parse_session_id(raw: &str) -> Result<SessionId, McpError> {
    SessionId::from_str(raw).map_err(|e| {
        warn!("Invalid session ID format: {}", raw);
        to_mcp_error(e)
    })
}

fn json_result<T: Serialize>(value: &T, fallback: impl FnOnce() -> String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(value).unwrap_or_else(|_| fallback()),
    )])
}

/// hashcrack MCP Server
///
/// Exposes cracking sessions via MCP tools.
#[derive(Clone)]
pub struct HashcrackServer {
    /// Session manager shared by all tool calls
    manager: Arc<SessionManager>,
    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl HashcrackServer {
    /// Build a server that launches hashcat as configured.
    pub fn from_config(config: ServerConfig) -> Self {
        let launcher = Arc::new(HashcatLauncher::new(config.cracker.clone()));
        let hasher = Arc::new(DigestHasher::new(config.hashing.clone()));
        Self::new(Arc::new(SessionManager::new(config, launcher, hasher)))
    }

    /// The session manager behind this server.
    pub fn manager(&self) -> &Arc<SessionManager> {
        &self.manager
    }

    /// Configured hash catalog.
    pub fn config_info(&self) -> ConfigResponse {
        let config = self.manager.config();
        ConfigResponse {
            hash_types: config.hashing.hash_types.clone(),
            default_hash_type: config.hashing.default_hash_type,
            max_running_sessions: config.server.max_running_sessions,
        }
    }

    /// Hash the password and start a session.
    pub fn start_session(&self, params: CrackStartParams) -> Result<CrackStartResponse, McpError> {
        let hash_type = params
            .hash_type
            .unwrap_or(self.manager.config().hashing.default_hash_type);

        let id = self
            .manager
            .start(&params.password, hash_type)
            .map_err(|e| {
                error!("Failed to start session: {}", e);
                to_mcp_error(e)
            })?;

        let snapshot = self.manager.query(&id).map_err(to_mcp_error)?;
        let name = self
            .manager
            .config()
            .hashing
            .find(hash_type)
            .map(|h| h.name.clone())
            .unwrap_or_else(|| hash_type.to_string());

        info!("Session started: session_id={}, hash_type={}", id, hash_type);

        Ok(CrackStartResponse {
            session_id: id.to_string(),
            hash_type,
            target_hash: snapshot.target_hash,
            message: format!("Cracking session started for {name} hash"),
        })
    }

    /// Look up one session.
    pub fn get_session(&self, session_id: &str) -> Result<SessionSnapshot, McpError> {
        let id = parse_session_id(session_id)?;
        self.manager.query(&id).map_err(|e| {
            debug!("Session lookup failed: {}", e);
            to_mcp_error(e)
        })
    }

    /// All sessions.
    pub fn list_sessions(&self) -> SessionListResponse {
        let sessions = self.manager.list_all();
        let count = sessions.len();
        SessionListResponse { sessions, count }
    }

    /// Stop one session.
    pub fn stop_session(&self, session_id: &str) -> Result<SessionStopResponse, McpError> {
        let id = parse_session_id(session_id)?;
        let snapshot = self.manager.stop(&id).map_err(|e| {
            warn!("Failed to stop session {}: {}", session_id, e);
            to_mcp_error(e)
        })?;

        Ok(SessionStopResponse {
            session_id: id.to_string(),
            status: snapshot.status,
            message: format!("Session '{}' is {}", id, snapshot.status),
        })
    }
}

#[tool_router]
impl HashcrackServer {
    /// Create a server over an existing session manager
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self {
            manager,
            tool_router: Self::tool_router(),
        }
    }

    /// Report configured hash types
    #[tool(description = "List the hash types that can be cracked and the default hash type")]
    #[instrument(skip_all)]
    async fn crack_config(
        &self,
        Parameters(_params): Parameters<ConfigParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Reporting configuration");
        let response = self.config_info();
        Ok(json_result(&response, || {
            format!("{} hash types configured", response.hash_types.len())
        }))
    }

    /// Start a cracking session
    #[tool(
        description = "Hash a password and start a hashcat session that tries to recover it. Returns immediately with a session id."
    )]
    #[instrument(skip_all)]
    async fn crack_start(
        &self,
        Parameters(params): Parameters<CrackStartParams>,
    ) -> Result<CallToolResult, McpError> {
        info!("Starting cracking session: hash_type={:?}", params.hash_type);
        let response = self.start_session(params)?;
        Ok(json_result(&response, || response.session_id.clone()))
    }

    /// Get a session's current state
    #[tool(
        description = "Get the current state of a cracking session: status, progress, speed, temperature and recovered password"
    )]
    #[instrument(skip_all)]
    async fn crack_session_get(
        &self,
        Parameters(params): Parameters<SessionGetParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Getting session: session_id={}", params.session_id);
        let snapshot = self.get_session(&params.session_id)?;
        Ok(json_result(&snapshot, || snapshot.status.to_string()))
    }

    /// List all sessions
    #[tool(description = "List all cracking sessions, oldest first")]
    #[instrument(skip_all)]
    async fn crack_session_list(
        &self,
        Parameters(_params): Parameters<SessionListParams>,
    ) -> Result<CallToolResult, McpError> {
        let response = self.list_sessions();
        info!("Found {} session(s)", response.count);
        Ok(json_result(&response, || {
            format!("{} sessions", response.count)
        }))
    }

    /// Stop a session
    #[tool(description = "Stop a running cracking session. Stopping a finished session is a no-op.")]
    #[instrument(skip_all)]
    async fn crack_session_stop(
        &self,
        Parameters(params): Parameters<SessionStopParams>,
    ) -> Result<CallToolResult, McpError> {
        info!("Stopping session: session_id={}", params.session_id);
        let response = self.stop_session(&params.session_id)?;
        Ok(json_result(&response, || response.message.clone()))
    }
}

// Implement the ServerHandler trait to define server capabilities
#[tool_handler]
impl rmcp::ServerHandler for HashcrackServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "hashcrack MCP Server - Run hashcat cracking sessions in the background. \
                 Use crack_config to see supported hash types, crack_start to begin a session, \
                 crack_session_get or crack_session_list to poll progress, and \
                 crack_session_stop to cancel."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
