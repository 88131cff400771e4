//! Ledgermind: agent-response extraction for an LLM-assisted finance ledger
//!
//! The surrounding application keeps transactions in client-side storage
//! and consults two hosted language-model agents: a categorizer for
//! transactions saved without a category, and a summarizer for periodic
//! spending insights. Model endpoints return text, not guaranteed-valid
//! JSON — this crate is the trust boundary that turns those replies into
//! typed records the ledger can rely on.
//!
//! # Core Concepts
//!
//! - **extract**: escalating-recovery JSON extraction from raw reply text
//! - **record**: typed projection with distinct shape-mismatch failures
//! - **agent**: the client seam (trait + mock) and the advisor composition
//! - **ledger**: the transaction and period value types agents consume
//!
//! # Example
//!
//! ```
//! use ledgermind::extract;
//!
//! let reply = "Sure! {\"result\": {\"suggested_category\": \"Groceries\"}} hope that helps";
//! let value = extract::extract_payload(reply).unwrap();
//! assert_eq!(value["suggested_category"], "Groceries");
//! ```

pub mod agent;
pub mod extract;
pub mod ledger;
pub mod record;

pub use agent::{Advisor, AgentClient, AgentError, MockClient};
pub use extract::{extract, extract_payload, payload, Candidate, ExtractError, Phase};
pub use ledger::{recent_transactions, Period, Transaction, TransactionDraft, TransactionKind};
pub use record::{
    decode, extract_record, CategorySuggestion, FinancialSummary, RecordError,
    SummaryStatistics,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
