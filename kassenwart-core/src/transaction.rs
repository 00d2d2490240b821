//! Transaction record and category types for the association ledger

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Accounting category, assigned by the classifier and overridable by the
/// reviewer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "membership-dues")]
    MembershipDues,
    #[serde(rename = "one-time-donation")]
    OneTimeDonation,
    #[serde(rename = "outgoing-donation")]
    OutgoingDonation,
    #[serde(rename = "other-expense")]
    OtherExpense,
    #[serde(rename = "bank-fee-contribution")]
    BankFeeContribution,
    #[serde(rename = "bank-fee-closing")]
    BankFeeClosing,
    #[serde(rename = "unclassified")]
    Unclassified,
}

impl Category {
    /// Display label as it appears in the treasurer's reports
    pub fn label(&self) -> &'static str {
        match self {
            Category::MembershipDues => "Mitgliedschaft",
            Category::OneTimeDonation => "Einmalspende",
            Category::OutgoingDonation => "Spende an CANAT",
            Category::OtherExpense => "Sonstige Ausgabe",
            Category::BankFeeContribution => "GLS Beitrag",
            Category::BankFeeClosing => "Kontoführungsgebühr",
            Category::Unclassified => "Unklassifiziert",
        }
    }

    pub fn is_bank_fee(&self) -> bool {
        matches!(self, Category::BankFeeContribution | Category::BankFeeClosing)
    }

    /// Categories whose amounts land on the "Sonstige Ausgaben" overview
    /// line. Bank fees are purpose-text refinements of OtherExpense and
    /// roll back into it, so the overview accounts for every non-zero
    /// booking.
    pub fn counts_as_other_expense(&self) -> bool {
        matches!(self, Category::OtherExpense) || self.is_bank_fee()
    }
}

/// A classified statement row; the unit the reviewer edits and the reports
/// sum over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Value date exactly as printed in the export
    pub value_date_raw: String,
    /// Parsed value date; None when the export's date string was malformed
    pub value_date: Option<NaiveDate>,
    /// Counterparty name; synthesized for bank closing fees
    pub counterparty: Option<String>,
    /// Positive = income, negative = expense
    pub amount: f64,
    pub currency: String,
    pub purpose: Option<String>,
    pub booking_text: Option<String>,
    /// Running balance after this booking, as stated by the bank
    pub balance_after: f64,
    pub category: Category,
    pub is_member: bool,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }
}
