//! Workbook export: the effective dataset plus every derived view, one
//! sheet each, in a fixed order.
//!
//! Internal bookkeeping (parsed dates, override ids) never reaches the
//! workbook; only what the treasurer hands to the board does.

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use thiserror::Error;

use kassenwart_core::{ExpenseRow, IncomeGroup, OverviewRow, Session, Transaction};

/// Fixed download name for the exported report
pub const EXPORT_FILE_NAME: &str = "kassenbericht.xlsx";

/// MIME type of the open spreadsheet format
pub const EXPORT_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Sheet names in workbook order
pub const SHEET_NAMES: [&str; 6] = [
    "Transaktionen",
    "Einnahmen",
    "Mitgliedsbeiträge",
    "Spenden",
    "Ausgaben",
    "Übersicht",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export: the statement has no transactions")]
    EmptyStatement,

    #[error("writing workbook: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Serialize the session's effective dataset and all derived views into a
/// workbook byte stream.
pub fn export_workbook(session: &Session) -> Result<Vec<u8>, ExportError> {
    if session.is_empty() {
        return Err(ExportError::EmptyStatement);
    }

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    write_transactions(
        workbook.add_worksheet().set_name(SHEET_NAMES[0])?,
        session.transactions(),
        &bold,
    )?;
    write_income_groups(
        workbook.add_worksheet().set_name(SHEET_NAMES[1])?,
        session.income_groups().iter(),
        &bold,
    )?;
    write_income_groups(
        workbook.add_worksheet().set_name(SHEET_NAMES[2])?,
        session.income_groups().iter().filter(|g| g.all_members),
        &bold,
    )?;
    write_income_groups(
        workbook.add_worksheet().set_name(SHEET_NAMES[3])?,
        session.income_groups().iter().filter(|g| !g.all_members),
        &bold,
    )?;
    write_expenses(
        workbook.add_worksheet().set_name(SHEET_NAMES[4])?,
        session.expenses(),
        &bold,
    )?;
    write_overview(
        workbook.add_worksheet().set_name(SHEET_NAMES[5])?,
        session.overview(),
        &bold,
    )?;

    Ok(workbook.save_to_buffer()?)
}

fn write_header(sheet: &mut Worksheet, titles: &[&str], bold: &Format) -> Result<(), XlsxError> {
    for (c, title) in titles.iter().enumerate() {
        sheet.write_string_with_format(0, c as u16, *title, bold)?;
    }
    Ok(())
}

fn write_transactions(
    sheet: &mut Worksheet,
    txns: &[Transaction],
    bold: &Format,
) -> Result<(), XlsxError> {
    write_header(
        sheet,
        &[
            "Valutadatum",
            "Name Zahlungsbeteiligter",
            "Betrag",
            "Waehrung",
            "Verwendungszweck",
            "Buchungstext",
            "Saldo nach Buchung",
            "Typ",
            "Mitglied",
        ],
        bold,
    )?;
    for (i, t) in txns.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, &t.value_date_raw)?;
        sheet.write_string(r, 1, t.counterparty.as_deref().unwrap_or(""))?;
        sheet.write_number(r, 2, t.amount)?;
        sheet.write_string(r, 3, &t.currency)?;
        sheet.write_string(r, 4, t.purpose.as_deref().unwrap_or(""))?;
        sheet.write_string(r, 5, t.booking_text.as_deref().unwrap_or(""))?;
        sheet.write_number(r, 6, t.balance_after)?;
        sheet.write_string(r, 7, t.category.label())?;
        sheet.write_boolean(r, 8, t.is_member)?;
    }
    Ok(())
}

fn write_income_groups<'a>(
    sheet: &mut Worksheet,
    groups: impl Iterator<Item = &'a IncomeGroup>,
    bold: &Format,
) -> Result<(), XlsxError> {
    write_header(
        sheet,
        &[
            "Name Zahlungsbeteiligter",
            "Betrag gesamt",
            "Einzelbeträge",
            "Valutadaten",
            "Mitglied",
        ],
        bold,
    )?;
    for (i, g) in groups.enumerate() {
        let r = i as u32 + 1;
        let amounts = g
            .amounts
            .iter()
            .map(|a| format!("{a:.2}"))
            .collect::<Vec<_>>()
            .join(", ");
        sheet.write_string(r, 0, g.counterparty.as_deref().unwrap_or(""))?;
        sheet.write_number(r, 1, g.total)?;
        sheet.write_string(r, 2, &amounts)?;
        sheet.write_string(r, 3, &g.dates.join(", "))?;
        sheet.write_boolean(r, 4, g.all_members)?;
    }
    Ok(())
}

fn write_expenses(
    sheet: &mut Worksheet,
    rows: &[ExpenseRow],
    bold: &Format,
) -> Result<(), XlsxError> {
    write_header(
        sheet,
        &[
            "Name Zahlungsbeteiligter",
            "Typ",
            "Betrag",
            "Waehrung",
            "Valutadatum",
        ],
        bold,
    )?;
    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, row.counterparty.as_deref().unwrap_or(""))?;
        sheet.write_string(r, 1, row.category.label())?;
        sheet.write_number(r, 2, row.amount)?;
        sheet.write_string(r, 3, &row.currency)?;
        sheet.write_string(r, 4, &row.value_date_raw)?;
    }
    Ok(())
}

fn write_overview(
    sheet: &mut Worksheet,
    rows: &[OverviewRow; 4],
    bold: &Format,
) -> Result<(), XlsxError> {
    write_header(sheet, &["Posten", "Betrag"], bold)?;
    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        sheet.write_string(r, 0, row.item.label())?;
        sheet.write_number(r, 1, row.amount)?;
    }
    Ok(())
}
