//! kassenwart-ingest: loads GLS Bank statement exports into normalized rows.

pub mod error;
pub mod parser;
pub mod types;

pub use error::LoadError;
pub use parser::{parse_statement, parse_statement_path};
pub use types::StatementRow;
