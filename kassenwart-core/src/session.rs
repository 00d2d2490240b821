//! One reviewer session: the loaded statement, the override store and the
//! eagerly rebuilt report views.
//!
//! The full pipeline (classify, merge overrides, aggregate) reruns on every
//! edit. At statement sizes of a few thousand rows that is always cheap,
//! and it keeps every view a pure function of the current inputs.

use kassenwart_ingest::{parse_statement, parse_statement_path, LoadError, StatementRow};
use std::path::Path;

use crate::aggregate::{self, ExpenseRow, IncomeGroup, Metrics, OverviewRow};
use crate::overrides::OverrideStore;
use crate::rules;
use crate::transaction::{Category, Transaction};

pub struct Session {
    rows: Vec<StatementRow>,
    overrides: OverrideStore,
    effective: Vec<Transaction>,
    income: Vec<IncomeGroup>,
    expenses: Vec<ExpenseRow>,
    overview: [OverviewRow; 4],
    metrics: Metrics,
}

impl Session {
    /// Parse, classify and aggregate a fresh statement. A new statement
    /// means a new session; overrides never survive a re-upload.
    pub fn load(text: &str) -> Result<Self, LoadError> {
        Ok(Self::from_rows(parse_statement(text)?))
    }

    /// Like [`Session::load`], reading the statement from disk.
    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Ok(Self::from_rows(parse_statement_path(path)?))
    }

    fn from_rows(rows: Vec<StatementRow>) -> Self {
        let mut session = Session {
            rows,
            overrides: OverrideStore::new(),
            effective: Vec::new(),
            income: Vec::new(),
            expenses: Vec::new(),
            overview: aggregate::overview(&[]),
            metrics: aggregate::metrics(&[], &[], &aggregate::overview(&[])),
        };
        session.recompute();
        session
    }

    /// Record a reviewer correction of the member flag and rebuild all
    /// views. Returns false (and changes nothing) for an unknown row id.
    pub fn set_member_flag(&mut self, id: usize, member: bool) -> bool {
        if id >= self.rows.len() {
            return false;
        }
        self.overrides.set_member_flag(id, member);
        self.recompute();
        true
    }

    /// Record a reviewer correction of the category and rebuild all views.
    pub fn set_category(&mut self, id: usize, category: Category) -> bool {
        if id >= self.rows.len() {
            return false;
        }
        self.overrides.set_category(id, category);
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        self.effective = self
            .rows
            .iter()
            .enumerate()
            .map(|(id, row)| {
                let mut txn = rules::classify_row(row);
                self.overrides.apply(id, &mut txn);
                txn
            })
            .collect();
        self.income = aggregate::group_income(&self.effective);
        self.expenses = aggregate::categorize_expenses(&self.effective);
        self.overview = aggregate::overview(&self.effective);
        self.metrics = aggregate::metrics(&self.effective, &self.income, &self.overview);
    }

    /// The effective dataset: classifier output with overrides applied,
    /// in statement order (ids are positions in this slice).
    pub fn transactions(&self) -> &[Transaction] {
        &self.effective
    }

    pub fn income_groups(&self) -> &[IncomeGroup] {
        &self.income
    }

    pub fn expenses(&self) -> &[ExpenseRow] {
        &self.expenses
    }

    pub fn overview(&self) -> &[OverviewRow; 4] {
        &self.overview
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// (value-date string, balance-after) series for the balance chart.
    pub fn balance_series(&self) -> Vec<(String, f64)> {
        aggregate::balance_series(&self.effective)
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    pub fn len(&self) -> usize {
        self.effective.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effective.is_empty()
    }
}
