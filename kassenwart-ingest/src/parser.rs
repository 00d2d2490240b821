//! Parser for GLS Bank account statement exports.
//!
//! The export is semicolon-delimited text with a header row:
//!   Valutadatum;Name Zahlungsbeteiligter;Betrag;Waehrung;Verwendungszweck;
//!   Buchungstext;Saldo nach Buchung
//! Numeric columns use the German decimal comma, dates are dd.mm.yyyy.

use chrono::NaiveDate;
use std::path::Path;
use tracing::warn;

use crate::error::LoadError;
use crate::types::StatementRow;

pub const COL_VALUE_DATE: &str = "Valutadatum";
pub const COL_COUNTERPARTY: &str = "Name Zahlungsbeteiligter";
pub const COL_AMOUNT: &str = "Betrag";
pub const COL_CURRENCY: &str = "Waehrung";
pub const COL_PURPOSE: &str = "Verwendungszweck";
pub const COL_BOOKING_TEXT: &str = "Buchungstext";
pub const COL_BALANCE_AFTER: &str = "Saldo nach Buchung";

const REQUIRED_COLUMNS: [&str; 7] = [
    COL_VALUE_DATE,
    COL_COUNTERPARTY,
    COL_AMOUNT,
    COL_CURRENCY,
    COL_PURPOSE,
    COL_BOOKING_TEXT,
    COL_BALANCE_AFTER,
];

const DATE_FORMAT: &str = "%d.%m.%Y";

/// Parse a statement export into normalized rows, sorted ascending by
/// parsed value date.
///
/// Sort order is stable; rows whose value date failed to parse sort after
/// all dated rows, keeping their relative file order.
pub fn parse_statement(text: &str) -> Result<Vec<StatementRow>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = rdr.headers()?.clone();
    let mut col = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in REQUIRED_COLUMNS.into_iter().enumerate() {
        col[slot] = headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(LoadError::MissingColumn(name))?;
    }
    // Same order as REQUIRED_COLUMNS
    let [date_c, name_c, amount_c, currency_c, purpose_c, booking_c, balance_c] = col;

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // Header occupies line 1 of the file
        let line = i + 2;
        let field = |c: usize| record.get(c).unwrap_or("").trim();

        let value_date_raw = field(date_c).to_string();
        let value_date = match NaiveDate::parse_from_str(&value_date_raw, DATE_FORMAT) {
            Ok(d) => Some(d),
            Err(_) => {
                warn!(line, raw = %value_date_raw, "unparseable value date, row kept undated");
                None
            }
        };

        rows.push(StatementRow {
            value_date_raw,
            value_date,
            counterparty: optional(field(name_c)),
            amount: parse_decimal(field(amount_c), COL_AMOUNT, line)?,
            currency: field(currency_c).to_string(),
            purpose: optional(field(purpose_c)),
            booking_text: optional(field(booking_c)),
            balance_after: parse_decimal(field(balance_c), COL_BALANCE_AFTER, line)?,
        });
    }

    rows.sort_by_key(|r| (r.value_date.is_none(), r.value_date));
    Ok(rows)
}

/// Parse a statement export from a file on disk.
pub fn parse_statement_path(path: impl AsRef<Path>) -> Result<Vec<StatementRow>, LoadError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_statement(&text)
}

/// Normalize the decimal comma before parsing.
fn parse_decimal(raw: &str, column: &'static str, line: usize) -> Result<f64, LoadError> {
    raw.replace(',', ".").parse().map_err(|_| LoadError::Numeric {
        column,
        value: raw.to_string(),
        line,
    })
}

fn optional(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Valutadatum;Name Zahlungsbeteiligter;Betrag;Waehrung;Verwendungszweck;Buchungstext;Saldo nach Buchung";

    fn statement(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn test_parse_basic() {
        let text = statement(&[
            "01.03.2024;Jane Doe;50,00;EUR;Beitrag;Dauerauftragsgutschr;1050,00",
            "02.03.2024;Stadtwerke;-31,40;EUR;Strom Maerz;Lastschrift;1018,60",
        ]);
        let rows = parse_statement(&text).unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.value_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(first.value_date_raw, "01.03.2024");
        assert_eq!(first.counterparty.as_deref(), Some("Jane Doe"));
        assert_eq!(first.amount, 50.00);
        assert_eq!(first.currency, "EUR");
        assert_eq!(first.purpose.as_deref(), Some("Beitrag"));
        assert_eq!(first.booking_text.as_deref(), Some("Dauerauftragsgutschr"));
        assert_eq!(first.balance_after, 1050.00);

        assert_eq!(rows[1].amount, -31.40);
        assert_eq!(rows[1].balance_after, 1018.60);
    }

    #[test]
    fn test_missing_column_rejected() {
        let text = "Valutadatum;Name Zahlungsbeteiligter;Betrag;Waehrung;Verwendungszweck;Saldo nach Buchung\n\
                    01.03.2024;Jane Doe;50,00;EUR;Beitrag;1050,00";
        let err = parse_statement(text).unwrap_err();
        match err {
            LoadError::MissingColumn(name) => assert_eq!(name, COL_BOOKING_TEXT),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_amount_rejected() {
        let text = statement(&["01.03.2024;Jane Doe;fifty;EUR;Beitrag;Dauerauftragsgutschr;1050,00"]);
        let err = parse_statement(&text).unwrap_err();
        match err {
            LoadError::Numeric { column, value, line } => {
                assert_eq!(column, COL_AMOUNT);
                assert_eq!(value, "fifty");
                assert_eq!(line, 2);
            }
            other => panic!("expected Numeric, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_date_keeps_row() {
        let text = statement(&["kein Datum;Jane Doe;50,00;EUR;Beitrag;Dauerauftragsgutschr;1050,00"]);
        let rows = parse_statement(&text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value_date, None);
        assert_eq!(rows[0].value_date_raw, "kein Datum");
    }

    #[test]
    fn test_sorted_ascending_undated_last() {
        let text = statement(&[
            "05.03.2024;B;1,00;EUR;;Lastschrift;1,00",
            "??;X;2,00;EUR;;Lastschrift;3,00",
            "01.03.2024;A;3,00;EUR;;Lastschrift;6,00",
            "--;Y;4,00;EUR;;Lastschrift;10,00",
        ]);
        let rows = parse_statement(&text).unwrap();
        let names: Vec<_> = rows
            .iter()
            .map(|r| r.counterparty.as_deref().unwrap())
            .collect();
        // Dated rows ascending, undated rows after them in file order
        assert_eq!(names, ["A", "B", "X", "Y"]);
    }

    #[test]
    fn test_empty_fields_are_none() {
        let text = statement(&["02.03.2024;;-8,90;EUR;;Abschluss;1041,10"]);
        let rows = parse_statement(&text).unwrap();
        assert_eq!(rows[0].counterparty, None);
        assert_eq!(rows[0].purpose, None);
    }

    #[test]
    fn test_column_order_is_free() {
        let text = "Betrag;Valutadatum;Name Zahlungsbeteiligter;Waehrung;Verwendungszweck;Buchungstext;Saldo nach Buchung\n\
                    50,00;01.03.2024;Jane Doe;EUR;Beitrag;Dauerauftragsgutschr;1050,00";
        let rows = parse_statement(text).unwrap();
        assert_eq!(rows[0].amount, 50.00);
        assert_eq!(rows[0].counterparty.as_deref(), Some("Jane Doe"));
    }
}
