use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Normalized output of the statement loader (one row per booking)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    /// Value date exactly as printed in the export
    pub value_date_raw: String,
    /// Parsed value date; None when the raw string does not match the
    /// export's dd.mm.yyyy pattern
    pub value_date: Option<NaiveDate>,
    /// Counterparty name; None for bank-internal postings
    pub counterparty: Option<String>,
    /// Positive = income, negative = expense
    pub amount: f64,
    pub currency: String,
    pub purpose: Option<String>,
    /// Bank-assigned transaction-type label ("Buchungstext")
    pub booking_text: Option<String>,
    /// Running balance after this booking, as stated by the bank
    pub balance_after: f64,
}
