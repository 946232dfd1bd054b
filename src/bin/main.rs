// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use ledger_transfer_rs::{AccountId, EngineConfig, TransferEngine};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Ledger Transfer - Replay account commands from a CSV file
///
/// Reads account creations and transfers from a CSV file and outputs the
/// final account balances to stdout.
#[derive(Parser, Debug)]
#[command(name = "ledger-transfer-rs")]
#[command(about = "Replays account creations and transfers from a CSV file", long_about = None)]
struct Args {
    /// Path to CSV file with commands
    ///
    /// Expected format: type,from,to,amount
    /// Example: cargo run -- commands.csv > accounts.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Give up on a transfer after waiting this long for an account lock
    #[arg(long, value_name = "MILLIS")]
    lock_timeout_ms: Option<u64>,

    /// Log filter used when RUST_LOG is not set (logs go to stderr)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    init_logging(&args.log_level);

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let mut config = EngineConfig::default();
    if let Some(millis) = args.lock_timeout_ms {
        config = config.with_lock_timeout(Duration::from_millis(millis));
    }
    let engine = TransferEngine::new().with_config(config);

    if let Err(e) = process_commands(&engine, BufReader::new(file)) {
        eprintln!("Error processing commands: {}", e);
        process::exit(1);
    }

    tracing::info!(
        accounts = engine.store().len(),
        total = %engine.store().total_balance(),
        "replay finished"
    );

    if let Err(e) = write_accounts(&engine, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Raw CSV record matching the input format.
///
/// Fields: `type, from, to, amount`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "type")]
    command: String,
    from: String,
    #[serde(default)]
    to: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    amount: Option<Decimal>,
}

/// A parsed ledger command.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Create {
        account_id: AccountId,
        balance: Decimal,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    },
}

impl CsvRecord {
    /// Converts CSV record to a command.
    ///
    /// Returns `None` for unknown command types or missing required fields.
    fn into_command(self) -> Option<Command> {
        let amount = self.amount?;
        match self.command.to_lowercase().as_str() {
            "create" => Some(Command::Create {
                account_id: AccountId(self.from),
                balance: amount,
            }),
            "transfer" => {
                let to = self.to.filter(|to| !to.is_empty())?;
                Some(Command::Transfer {
                    from: AccountId(self.from),
                    to: AccountId(to),
                    amount,
                })
            }
            _ => None,
        }
    }
}

/// Replay commands from a CSV reader against the engine.
///
/// Rows are streamed, so arbitrarily large files are never loaded whole.
/// Malformed rows and rejected commands are logged and skipped.
///
/// # CSV Format
///
/// Expected columns: `type, from, to, amount`
/// - `type`: `create` or `transfer`
/// - `from`: Account to create, or source of the transfer
/// - `to`: Destination of the transfer (empty for `create`)
/// - `amount`: Initial balance or transfer amount
///
/// # Example
///
/// ```csv
/// type,from,to,amount
/// create,Id-101,,5000
/// create,Id-102,,2000
/// transfer,Id-101,Id-102,1000
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
fn process_commands<R: Read>(engine: &TransferEngine, reader: R) -> Result<(), csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    for (line, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(line, error = %e, "skipping malformed row");
                continue;
            }
        };

        let Some(command) = record.into_command() else {
            tracing::warn!(line, "skipping invalid command record");
            continue;
        };

        let outcome = match &command {
            Command::Create {
                account_id,
                balance,
            } => engine.create_account(account_id.clone(), *balance),
            Command::Transfer { from, to, amount } => engine.transfer(from, to, *amount),
        };
        if let Err(e) = outcome {
            tracing::warn!(line, ?command, error = %e, "skipping rejected command");
        }
    }

    Ok(())
}

/// Write account balances to a CSV writer, sorted by account ID.
///
/// # CSV Format
///
/// Columns: `accountId, balance`
///
/// # Errors
///
/// Returns a CSV error if writing fails.
fn write_accounts<W: Write>(engine: &TransferEngine, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    let mut accounts = engine.list_accounts();
    accounts.sort_by(|a, b| a.id().cmp(b.id()));
    for account in &accounts {
        wtr.serialize(account)?;
    }

    wtr.flush()?;
    Ok(())
}
