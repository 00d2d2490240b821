//! Derived report views over the effective dataset: grouped income,
//! categorized expenses, the four-line overview and the metric tiles.
//!
//! Everything here is a pure function of its inputs; the session recomputes
//! all of it eagerly after every edit.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::transaction::{Category, Transaction};

/// One income counterparty with all of its credited amounts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeGroup {
    /// None groups the (rare) credits booked without a counterparty
    pub counterparty: Option<String>,
    pub total: f64,
    /// Individual amounts in the group's transaction order
    pub amounts: Vec<f64>,
    /// Verbatim value-date strings, parallel to `amounts`
    pub dates: Vec<String>,
    /// True only if every credit from this counterparty is member-flagged
    pub all_members: bool,
}

/// One row of the expense report (the member flag is meaningless for
/// expenses and is dropped here)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseRow {
    pub counterparty: Option<String>,
    pub category: Category,
    pub amount: f64,
    pub currency: String,
    pub value_date_raw: String,
}

/// The four fixed overview line items, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverviewItem {
    MembershipIncome,
    DonationIncome,
    OutgoingDonations,
    OtherExpenses,
}

impl OverviewItem {
    pub fn label(&self) -> &'static str {
        match self {
            OverviewItem::MembershipIncome => "Einnahmen durch Mitgliedschaften",
            OverviewItem::DonationIncome => "Einnahmen durch Einmalspenden",
            OverviewItem::OutgoingDonations => "Überweisungen an CANAT",
            OverviewItem::OtherExpenses => "Sonstige Ausgaben",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverviewRow {
    pub item: OverviewItem,
    pub amount: f64,
}

/// Scalar figures for the shell's metric tiles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub first_value_date: Option<NaiveDate>,
    pub last_value_date: Option<NaiveDate>,
    /// Income groups whose every credit is member-flagged
    pub active_members: usize,
    pub membership_income: f64,
    pub donation_income: f64,
    pub total_income: f64,
    pub outgoing_donations: f64,
    pub other_expenses: f64,
    pub total_expenses: f64,
}

/// Group income transactions (amount > 0) by counterparty.
///
/// Groups keep first-appearance order, except that all-member groups sort
/// before mixed and non-member groups (stable).
pub fn group_income(txns: &[Transaction]) -> Vec<IncomeGroup> {
    let mut groups: Vec<IncomeGroup> = Vec::new();
    let mut index: HashMap<Option<String>, usize> = HashMap::new();

    for t in txns.iter().filter(|t| t.amount > 0.0) {
        let slot = *index.entry(t.counterparty.clone()).or_insert_with(|| {
            groups.push(IncomeGroup {
                counterparty: t.counterparty.clone(),
                total: 0.0,
                amounts: Vec::new(),
                dates: Vec::new(),
                all_members: true,
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.total += t.amount;
        group.amounts.push(t.amount);
        group.dates.push(t.value_date_raw.clone());
        group.all_members &= t.is_member;
    }

    groups.sort_by_key(|g| !g.all_members);
    groups
}

/// Expense report rows (amount < 0; zero-amount rows belong to no report),
/// sorted descending by counterparty name with unnamed rows last.
pub fn categorize_expenses(txns: &[Transaction]) -> Vec<ExpenseRow> {
    let mut rows: Vec<ExpenseRow> = txns
        .iter()
        .filter(|t| t.amount < 0.0)
        .map(|t| ExpenseRow {
            counterparty: t.counterparty.clone(),
            category: t.category,
            amount: t.amount,
            currency: t.currency.clone(),
            value_date_raw: t.value_date_raw.clone(),
        })
        .collect();

    rows.sort_by(|a, b| match (&a.counterparty, &b.counterparty) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    rows
}

/// The four-line overview. Sums over empty filters are 0.0, and zero-amount
/// rows are excluded from every line.
pub fn overview(txns: &[Transaction]) -> [OverviewRow; 4] {
    let mut membership = 0.0;
    let mut donations = 0.0;
    let mut outgoing = 0.0;
    let mut other = 0.0;

    for t in txns {
        if t.amount == 0.0 {
            continue;
        }
        if t.amount > 0.0 {
            if t.is_member {
                membership += t.amount;
            } else {
                donations += t.amount;
            }
        } else if t.category == Category::OutgoingDonation {
            outgoing += t.amount;
        } else if t.category.counts_as_other_expense() {
            other += t.amount;
        }
    }

    [
        OverviewRow {
            item: OverviewItem::MembershipIncome,
            amount: membership,
        },
        OverviewRow {
            item: OverviewItem::DonationIncome,
            amount: donations,
        },
        OverviewRow {
            item: OverviewItem::OutgoingDonations,
            amount: outgoing,
        },
        OverviewRow {
            item: OverviewItem::OtherExpenses,
            amount: other,
        },
    ]
}

/// Re-derive the tile figures from the overview and income groups.
pub fn metrics(
    txns: &[Transaction],
    income: &[IncomeGroup],
    overview: &[OverviewRow; 4],
) -> Metrics {
    let membership_income = overview[0].amount;
    let donation_income = overview[1].amount;
    let outgoing_donations = overview[2].amount;
    let other_expenses = overview[3].amount;

    Metrics {
        first_value_date: txns.iter().filter_map(|t| t.value_date).min(),
        last_value_date: txns.iter().filter_map(|t| t.value_date).max(),
        active_members: income.iter().filter(|g| g.all_members).count(),
        membership_income,
        donation_income,
        total_income: membership_income + donation_income,
        outgoing_donations,
        other_expenses,
        total_expenses: outgoing_donations + other_expenses,
    }
}

/// (value-date string, balance-after) series for the balance line chart
pub fn balance_series(txns: &[Transaction]) -> Vec<(String, f64)> {
    txns.iter()
        .map(|t| (t.value_date_raw.clone(), t.balance_after))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(
        date: &str,
        counterparty: &str,
        amount: f64,
        category: Category,
        is_member: bool,
    ) -> Transaction {
        Transaction {
            value_date_raw: date.to_string(),
            value_date: chrono::NaiveDate::parse_from_str(date, "%d.%m.%Y").ok(),
            counterparty: (!counterparty.is_empty()).then(|| counterparty.to_string()),
            amount,
            currency: "EUR".to_string(),
            purpose: None,
            booking_text: None,
            balance_after: 0.0,
            category,
            is_member,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn("01.03.2024", "Jane Doe", 50.0, Category::MembershipDues, true),
            txn("02.03.2024", "John Smith", 25.0, Category::OneTimeDonation, false),
            txn("15.03.2024", "Jane Doe", 50.0, Category::MembershipDues, true),
            txn("20.03.2024", "CANAT", -60.0, Category::OutgoingDonation, false),
            txn("21.03.2024", "Stadtwerke", -31.4, Category::OtherExpense, false),
            txn("31.03.2024", "GLS Bank", -8.9, Category::BankFeeClosing, false),
        ]
    }

    #[test]
    fn test_income_grouping_example() {
        let groups = group_income(&sample());
        assert_eq!(groups.len(), 2);

        let jane = &groups[0];
        assert_eq!(jane.counterparty.as_deref(), Some("Jane Doe"));
        assert_eq!(jane.total, 100.0);
        assert_eq!(jane.amounts, vec![50.0, 50.0]);
        assert_eq!(jane.dates, vec!["01.03.2024", "15.03.2024"]);
        assert!(jane.all_members);

        let john = &groups[1];
        assert_eq!(john.counterparty.as_deref(), Some("John Smith"));
        assert_eq!(john.total, 25.0);
        assert!(!john.all_members);
    }

    #[test]
    fn test_group_totals_match_their_amounts() {
        for group in group_income(&sample()) {
            let listed: f64 = group.amounts.iter().sum();
            assert_eq!(listed, group.total);
        }
    }

    #[test]
    fn test_member_groups_sort_first() {
        let txns = vec![
            txn("01.03.2024", "Donor", 10.0, Category::OneTimeDonation, false),
            txn("02.03.2024", "Member", 50.0, Category::MembershipDues, true),
        ];
        let groups = group_income(&txns);
        assert_eq!(groups[0].counterparty.as_deref(), Some("Member"));
        assert_eq!(groups[1].counterparty.as_deref(), Some("Donor"));
    }

    #[test]
    fn test_mixed_group_is_not_all_members() {
        let txns = vec![
            txn("01.03.2024", "Jane Doe", 50.0, Category::MembershipDues, true),
            txn("02.03.2024", "Jane Doe", 20.0, Category::OneTimeDonation, false),
        ];
        let groups = group_income(&txns);
        assert_eq!(groups.len(), 1);
        assert!(!groups[0].all_members);
    }

    #[test]
    fn test_expenses_sorted_descending_unnamed_last() {
        let txns = vec![
            txn("01.03.2024", "Alpha", -1.0, Category::OtherExpense, false),
            txn("02.03.2024", "", -2.0, Category::OtherExpense, false),
            txn("03.03.2024", "Zeta", -3.0, Category::OtherExpense, false),
        ];
        let rows = categorize_expenses(&txns);
        let names: Vec<_> = rows.iter().map(|r| r.counterparty.as_deref()).collect();
        assert_eq!(names, [Some("Zeta"), Some("Alpha"), None]);
    }

    #[test]
    fn test_zero_amount_rows_appear_in_no_view() {
        let txns = vec![txn("01.03.2024", "Bank", 0.0, Category::Unclassified, false)];
        assert!(group_income(&txns).is_empty());
        assert!(categorize_expenses(&txns).is_empty());
        for row in overview(&txns) {
            assert_eq!(row.amount, 0.0);
        }
    }

    #[test]
    fn test_overview_example() {
        let rows = overview(&sample());
        assert_eq!(rows[0].item, OverviewItem::MembershipIncome);
        assert_eq!(rows[0].amount, 100.0);
        assert_eq!(rows[1].amount, 25.0);
        assert_eq!(rows[2].amount, -60.0);
        // Bank fee rolls into the other-expenses line
        assert_eq!(rows[3].amount, -31.4 - 8.9);
    }

    #[test]
    fn test_overview_accounts_for_every_nonzero_amount() {
        let mut txns = sample();
        txns.push(txn("01.04.2024", "Bank", 0.0, Category::Unclassified, false));
        // An unmatched credit counts as donation income in the overview
        txns.push(txn("02.04.2024", "Gutschrift", 7.5, Category::Unclassified, false));

        let total_overview: f64 = overview(&txns).iter().map(|r| r.amount).sum();
        let total_nonzero: f64 = txns
            .iter()
            .filter(|t| t.amount != 0.0)
            .map(|t| t.amount)
            .sum();
        assert!((total_overview - total_nonzero).abs() < 1e-9);
    }

    #[test]
    fn test_overview_of_empty_dataset_is_all_zero() {
        for row in overview(&[]) {
            assert_eq!(row.amount, 0.0);
        }
    }

    #[test]
    fn test_metrics() {
        let txns = sample();
        let income = group_income(&txns);
        let m = metrics(&txns, &income, &overview(&txns));

        assert_eq!(
            m.first_value_date,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(
            m.last_value_date,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 31)
        );
        assert_eq!(m.active_members, 1);
        assert_eq!(m.total_income, 125.0);
        assert!((m.total_expenses - (-60.0 - 31.4 - 8.9)).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_of_empty_dataset() {
        let m = metrics(&[], &[], &overview(&[]));
        assert_eq!(m.first_value_date, None);
        assert_eq!(m.active_members, 0);
        assert_eq!(m.total_income, 0.0);
        assert_eq!(m.total_expenses, 0.0);
    }

    #[test]
    fn test_balance_series_follows_statement_order() {
        let mut txns = sample();
        txns[0].balance_after = 1050.0;
        let series = balance_series(&txns);
        assert_eq!(series.len(), txns.len());
        assert_eq!(series[0], ("01.03.2024".to_string(), 1050.0));
    }
}
