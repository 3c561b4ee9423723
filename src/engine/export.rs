use std::io::Write;

use crate::engine::{Account, CURRENCY, TransactionRecord};

pub const REPORT_HEADER: &str = "=== BANK ACCOUNT DATA ===";
pub const HISTORY_HEADER: &str = "Transaction history:";

/// Writes the plain text report: identity fields, balance, then one line per ledger entry.
pub fn write_text_report<W: Write>(account: &Account, mut out: W) -> std::io::Result<()> {
    writeln!(out, "{REPORT_HEADER}")?;
    writeln!(out, "Account number: {}", account.number())?;
    writeln!(out, "BIK: {}", account.bik())?;
    writeln!(out, "KPP: {}", account.kpp())?;
    writeln!(out, "Balance: {} {}", account.balance(), CURRENCY)?;
    writeln!(out, "{HISTORY_HEADER}")?;
    for tx in account.transactions() {
        writeln!(out, "{tx}")?;
    }
    out.flush()
}

pub fn write_csv_ledger<W: Write>(account: &Account, out: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);

    log::debug!("Starting ledger serialisation for account {}", account.number());
    for tx in account.transactions() {
        wtr.serialize(TransactionRecord::from(tx))?;
    }

    log::debug!("Ledger serialisation done -> Flushing");
    wtr.flush()?;

    Ok(())
}
