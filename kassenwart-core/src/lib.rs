//! kassenwart-core: classification, reviewer overrides and report
//! aggregation for association bank statements.

pub mod aggregate;
pub mod overrides;
pub mod rules;
pub mod session;
pub mod transaction;

pub use aggregate::{
    balance_series, categorize_expenses, group_income, metrics, overview, ExpenseRow,
    IncomeGroup, Metrics, OverviewItem, OverviewRow,
};
pub use overrides::OverrideStore;
pub use rules::{classify, classify_row, Classified};
pub use session::Session;
pub use transaction::{Category, Transaction};
