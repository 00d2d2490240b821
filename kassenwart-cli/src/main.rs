use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use kassenwart_core::{Category, Session};
use kassenwart_report::{export_workbook, EXPORT_FILE_NAME};

#[derive(Parser, Debug)]
#[command(
    name = "kassenwart",
    version,
    about = "Bank-statement review and reporting for the association treasurer"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the classified statement, the report views and the metric tiles
    Report {
        /// Path to the bank's semicolon-delimited statement export
        #[arg(long)]
        csv: PathBuf,

        /// JSON file with reviewer corrections
        #[arg(long)]
        overrides: Option<PathBuf>,
    },

    /// Write the reviewed statement as a multi-sheet workbook
    Export {
        /// Path to the bank's semicolon-delimited statement export
        #[arg(long)]
        csv: PathBuf,

        /// JSON file with reviewer corrections
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Output path (default: kassenbericht.xlsx)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// One reviewer correction, as stored in the overrides file:
/// `[{ "row": 1, "member": true }, { "row": 4, "category": "other-expense" }]`
#[derive(Debug, Deserialize)]
struct OverrideEntry {
    row: usize,
    #[serde(default)]
    member: Option<bool>,
    #[serde(default)]
    category: Option<Category>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Report { csv, overrides } => {
            let session = open_session(&csv, overrides.as_deref())?;
            print_report(&session);
        }

        Command::Export {
            csv,
            overrides,
            out,
        } => {
            let session = open_session(&csv, overrides.as_deref())?;
            let bytes = export_workbook(&session)?;
            let out = out.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
            fs::write(&out, &bytes).with_context(|| format!("writing {}", out.display()))?;
            println!("Wrote {} ({} bytes)", out.display(), bytes.len());
        }
    }

    Ok(())
}

fn open_session(csv: &Path, overrides: Option<&Path>) -> Result<Session> {
    let mut session =
        Session::load_path(csv).with_context(|| format!("loading statement {}", csv.display()))?;

    if let Some(path) = overrides {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading overrides {}", path.display()))?;
        let entries: Vec<OverrideEntry> =
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        for entry in entries {
            if let Some(member) = entry.member {
                if !session.set_member_flag(entry.row, member) {
                    bail!("override refers to unknown row {}", entry.row);
                }
            }
            if let Some(category) = entry.category {
                if !session.set_category(entry.row, category) {
                    bail!("override refers to unknown row {}", entry.row);
                }
            }
        }
    }

    Ok(session)
}

fn print_report(session: &Session) {
    let m = session.metrics();

    println!("Transaktionen ({})", session.len());
    for (id, t) in session.transactions().iter().enumerate() {
        println!(
            "  [{id:>3}] {:>10}  {:>9.2} {}  {:<22} {}{}",
            t.value_date_raw,
            t.amount,
            t.currency,
            t.category.label(),
            t.counterparty.as_deref().unwrap_or("-"),
            if t.is_member { "  (Mitglied)" } else { "" },
        );
    }

    println!("\nAggregierte Einnahmen");
    for g in session.income_groups() {
        println!(
            "  {:<28} {:>9.2}  ({} Buchungen{})",
            g.counterparty.as_deref().unwrap_or("-"),
            g.total,
            g.amounts.len(),
            if g.all_members { ", Mitglied" } else { "" },
        );
    }

    println!("\nAusgaben");
    for row in session.expenses() {
        println!(
            "  {:<28} {:<22} {:>9.2} {}  {}",
            row.counterparty.as_deref().unwrap_or("-"),
            row.category.label(),
            row.amount,
            row.currency,
            row.value_date_raw,
        );
    }

    println!("\nÜbersicht");
    for row in session.overview() {
        println!("  {:<36} {:>9.2}", row.item.label(), row.amount);
    }

    match (m.first_value_date, m.last_value_date) {
        (Some(first), Some(last)) => println!("\nZeitraum: {first} bis {last}"),
        _ => println!("\nZeitraum: unbekannt"),
    }
    println!("Aktive Mitglieder: {}", m.active_members);
    println!(
        "Einnahmen gesamt: {:.2}  (Mitgliedschaften {:.2}, Einmalspenden {:.2})",
        m.total_income, m.membership_income, m.donation_income
    );
    println!(
        "Ausgaben gesamt: {:.2}  (Weiterleitungen {:.2}, Sonstige {:.2})",
        m.total_expenses, m.outgoing_donations, m.other_expenses
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_file_format() {
        let entries: Vec<OverrideEntry> = serde_json::from_str(
            r#"[
                { "row": 1, "member": true },
                { "row": 4, "category": "outgoing-donation" },
                { "row": 2, "member": false, "category": "other-expense" }
            ]"#,
        )
        .unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].row, 1);
        assert_eq!(entries[0].member, Some(true));
        assert_eq!(entries[0].category, None);
        assert_eq!(entries[1].category, Some(Category::OutgoingDonation));
        assert_eq!(entries[2].member, Some(false));
    }
}
