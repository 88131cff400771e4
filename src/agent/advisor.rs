//! Advisor — composes the agent client with the extraction layer.
//!
//! Mirrors the two ledger flows: suggest a category for a transaction
//! being saved without one, and summarize spending over a reporting
//! period. Transport failures surface as errors; an unusable reply
//! degrades to "no suggestion" so the ledger can fall back to manual
//! entry or an empty insights pane. The degrade is explicit here, at the
//! call-site seam — the extraction and record layers below keep their
//! distinct failure kinds.

use crate::agent::{AgentClient, AgentError};
use crate::ledger::{Period, Transaction, TransactionDraft};
use crate::record::{extract_record, CategorySuggestion, FinancialSummary};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::warn;

/// Ledger-facing entry point for agent consultations.
pub struct Advisor {
    /// The agent client (mock or real)
    client: Arc<dyn AgentClient>,
    /// Agent id for transaction categorization
    categorizer_agent: String,
    /// Agent id for spending summaries
    summary_agent: String,
}

impl Advisor {
    pub fn new(
        client: Arc<dyn AgentClient>,
        categorizer_agent: impl Into<String>,
        summary_agent: impl Into<String>,
    ) -> Self {
        Self {
            client,
            categorizer_agent: categorizer_agent.into(),
            summary_agent: summary_agent.into(),
        }
    }

    /// Ask the categorizer agent for a category suggestion.
    ///
    /// `Ok(None)` means the agent answered but no usable record came
    /// back; the transaction keeps whatever category the user typed,
    /// possibly none.
    pub async fn suggest_category(
        &self,
        draft: &TransactionDraft,
    ) -> Result<Option<CategorySuggestion>, AgentError> {
        let message =
            serde_json::to_string(draft).expect("draft serialization should not fail");
        self.consult(&self.categorizer_agent, &message, "categorizer")
            .await
    }

    /// Ask the summary agent for insights over the period's transactions.
    ///
    /// Callers select the transactions for the window first (see
    /// [`crate::ledger::recent_transactions`]).
    pub async fn summarize(
        &self,
        transactions: &[Transaction],
        period: Period,
    ) -> Result<Option<FinancialSummary>, AgentError> {
        let message = serde_json::json!({
            "transactions": transactions,
            "period": period,
        })
        .to_string();
        self.consult(&self.summary_agent, &message, "summarizer").await
    }

    /// Invoke one agent and project its reply, degrading on unusable text.
    async fn consult<T: DeserializeOwned>(
        &self,
        agent_id: &str,
        message: &str,
        role: &str,
    ) -> Result<Option<T>, AgentError> {
        if !self.client.is_available().await {
            warn!(role, "agent endpoint unavailable, skipping consultation");
            return Ok(None);
        }

        let reply = self.client.chat(agent_id, message).await?;

        match extract_record::<T>(&reply) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                warn!(role, %err, "agent reply unusable, no suggestion");
                Ok(None)
            }
        }
    }
}
