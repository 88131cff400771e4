//! Ledger input types — the transaction data the agents consume.
//!
//! The surrounding application owns storage and rendering; this crate
//! only needs the value types that become agent request payloads, plus
//! the reporting-period arithmetic for selecting which transactions to
//! summarize. No clock is read here — callers pass the reference date.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

/// A ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    /// None until the user picks one or the categorizer fills it in.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Transaction {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            date,
            category: None,
            kind,
            notes: None,
        }
    }

    /// The categorizer request payload for this transaction.
    pub fn draft(&self) -> TransactionDraft {
        TransactionDraft {
            description: self.description.clone(),
            amount: self.amount,
            kind: self.kind,
        }
    }
}

/// What the categorizer agent sees: description, amount, and direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

/// Reporting window for the summary agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    Month,
}

impl Period {
    /// Inclusive start of the window ending at `today`.
    pub fn window_start(self, today: NaiveDate) -> NaiveDate {
        match self {
            Period::Week => today - Days::new(7),
            Period::Month => today - Months::new(1),
        }
    }
}

/// Transactions dated inside the period's window ending at `today`.
pub fn recent_transactions(
    transactions: &[Transaction],
    period: Period,
    today: NaiveDate,
) -> Vec<Transaction> {
    let start = period.window_start(today);
    transactions
        .iter()
        .filter(|t| t.date >= start)
        .cloned()
        .collect()
}
