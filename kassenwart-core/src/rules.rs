//! Ordered classification rules mapping statement rows to accounting
//! categories and the member flag.
//!
//! Evaluation is top-down, first match wins; afterwards a purpose-text
//! refinement pass narrows non-positive rows into the bank-fee categories.

use kassenwart_ingest::StatementRow;

use crate::transaction::{Category, Transaction};

pub const BOOKING_STANDING_ORDER_CREDIT: &str = "Dauerauftragsgutschr";
pub const BOOKING_TRANSFER_CREDIT: &str = "Überweisungsgutschr.";
pub const BOOKING_FOREIGN_TRANSFER: &str = "Internet-Ausl.-Überweisung";

/// Counterparty synthesized for closing fees the bank books without one
pub const BANK_NAME: &str = "GLS Bank";

const PURPOSE_BANK_CONTRIBUTION: &str = "GLS Beitrag";
const PURPOSE_CLOSING: &str = "Abschluss";

/// Classifier output for one row
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub category: Category,
    pub is_member: bool,
    /// Counterparty after synthesis (closing fees carry the bank's name)
    pub counterparty: Option<String>,
}

struct Rule {
    applies: fn(&StatementRow) -> bool,
    category: Category,
    is_member: bool,
}

/// The fixed precedence order. Rows matching no rule stay Unclassified;
/// in particular a zero amount never counts as income or expense.
const RULES: [Rule; 4] = [
    Rule {
        applies: |r| r.amount > 0.0 && booking_is(r, BOOKING_STANDING_ORDER_CREDIT),
        category: Category::MembershipDues,
        is_member: true,
    },
    Rule {
        applies: |r| r.amount > 0.0 && booking_is(r, BOOKING_TRANSFER_CREDIT),
        category: Category::OneTimeDonation,
        is_member: false,
    },
    Rule {
        applies: |r| r.amount < 0.0 && booking_is(r, BOOKING_FOREIGN_TRANSFER),
        category: Category::OutgoingDonation,
        is_member: false,
    },
    Rule {
        applies: |r| r.amount < 0.0,
        category: Category::OtherExpense,
        is_member: false,
    },
];

fn booking_is(row: &StatementRow, label: &str) -> bool {
    row.booking_text.as_deref() == Some(label)
}

/// Pure classification of a statement row's pre-category fields.
///
/// Re-running it on the same row always yields the same result.
pub fn classify(row: &StatementRow) -> Classified {
    let mut category = Category::Unclassified;
    let mut is_member = false;
    for rule in &RULES {
        if (rule.applies)(row) {
            category = rule.category;
            is_member = rule.is_member;
            break;
        }
    }

    let mut counterparty = row.counterparty.clone();
    if row.amount <= 0.0 {
        // Case-sensitive substring checks; a missing purpose never matches.
        // The closing-fee check runs second and wins if both match.
        let purpose = row.purpose.as_deref().unwrap_or("");
        if purpose.contains(PURPOSE_BANK_CONTRIBUTION) {
            category = Category::BankFeeContribution;
        }
        if purpose.contains(PURPOSE_CLOSING) && row.counterparty.is_none() {
            category = Category::BankFeeClosing;
            counterparty = Some(BANK_NAME.to_string());
        }
    }

    Classified {
        category,
        is_member,
        counterparty,
    }
}

/// Classify a row and carry its fields over into a [`Transaction`].
pub fn classify_row(row: &StatementRow) -> Transaction {
    let classified = classify(row);
    Transaction {
        value_date_raw: row.value_date_raw.clone(),
        value_date: row.value_date,
        counterparty: classified.counterparty,
        amount: row.amount,
        currency: row.currency.clone(),
        purpose: row.purpose.clone(),
        booking_text: row.booking_text.clone(),
        balance_after: row.balance_after,
        category: classified.category,
        is_member: classified.is_member,
    }
}
