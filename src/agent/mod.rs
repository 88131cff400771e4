//! Agent client — the seam to the hosted inference endpoint.
//!
//! The ledger consults two hosted agents: a transaction categorizer and a
//! spending summarizer. The trait abstracts over transport so the advisor
//! does not depend on how the endpoint is reached; this crate ships the
//! trait and a mock implementation, and the host application owns the real
//! network transport.

mod advisor;

pub use advisor::Advisor;

use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Errors from agent invocation.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent endpoint not available: {0}")]
    Unavailable(String),
    #[error("unknown agent: {0}")]
    UnknownAgent(String),
    #[error("agent request failed: {0}")]
    RequestFailed(String),
}

/// Client trait for invoking hosted agents.
///
/// Abstracts over transport (HTTP, mock) so the advisor doesn't depend on
/// how the endpoint is reached.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Check if the endpoint is reachable.
    async fn is_available(&self) -> bool;

    /// Send a message to an agent and return its raw reply text.
    ///
    /// The reply is whatever the model produced — prose, fenced markdown,
    /// near-JSON. Turning it into a typed record is the extraction layer's
    /// job, not the client's.
    async fn chat(&self, agent_id: &str, message: &str) -> Result<String, AgentError>;
}

/// Mock client for testing — returns preconfigured replies.
pub struct MockClient {
    available: bool,
    replies: HashMap<String, Result<String, AgentError>>,
}

impl MockClient {
    /// Create a mock client that reports as available.
    pub fn available() -> Self {
        Self {
            available: true,
            replies: HashMap::new(),
        }
    }

    /// Create a mock client that reports as unavailable.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            replies: HashMap::new(),
        }
    }

    /// Register a reply for a specific agent id.
    pub fn with_reply(
        mut self,
        agent_id: impl Into<String>,
        reply: impl Into<String>,
    ) -> Self {
        self.replies.insert(agent_id.into(), Ok(reply.into()));
        self
    }

    /// Register a transport failure for a specific agent id.
    pub fn with_failure(mut self, agent_id: impl Into<String>, error: AgentError) -> Self {
        self.replies.insert(agent_id.into(), Err(error));
        self
    }
}

#[async_trait]
impl AgentClient for MockClient {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn chat(&self, agent_id: &str, _message: &str) -> Result<String, AgentError> {
        if !self.available {
            return Err(AgentError::Unavailable(
                "mock client configured as unavailable".to_string(),
            ));
        }

        match self.replies.get(agent_id) {
            Some(Ok(reply)) => Ok(reply.clone()),
            Some(Err(_)) => Err(AgentError::RequestFailed(format!(
                "mock failure for agent '{}'",
                agent_id
            ))),
            None => Err(AgentError::UnknownAgent(format!(
                "no mock reply for agent '{}'",
                agent_id
            ))),
        }
    }
}
