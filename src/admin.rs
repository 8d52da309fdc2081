use log::{debug, info, warn};

use poll_core::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use crate::admin::config_reader::*;
use crate::args::{Args, Command};

mod config_reader;
mod io_common;
mod io_csv;

#[derive(Debug, Snafu)]
pub enum AdminError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the poll file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing JSON output"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Invalid poll configuration"))]
    InvalidPoll { source: PollError },
    #[snafu(display("Unknown poll status {status:?}"))]
    UnknownStatus { status: String },
    #[snafu(display("Error processing CSV data"))]
    Csv { source: CodecError },
    #[snafu(display("Error reading CSV file {path}"))]
    CsvImport { source: CodecError, path: String },
    #[snafu(display("{count} invalid identifier(s)"))]
    InvalidIdentifiers { count: usize },
    #[snafu(display("Difference detected between the output and the reference {path}"))]
    ReferenceMismatch { path: String },
}

pub type AdminResult<T> = Result<T, AdminError>;
pub type BAdminResult<T> = Result<T, Box<AdminError>>;

pub fn run(args: &Args) -> BAdminResult<()> {
    match &args.command {
        Command::ValidateRut { ruts } => run_validate_rut(ruts)?,
        Command::FormatRut { ruts } => run_format_rut(ruts),
        Command::Summary => {
            let poll = load_poll(&args.config)?;
            print!("{}", tally::summary_text(&tally::tally(&poll)));
        }
        Command::ExportResults => {
            let poll = load_poll(&args.config)?;
            let rows = tally::results_rows(&tally::tally(&poll));
            run_export(&rows, &args.out, &args.reference)?;
        }
        Command::ExportVotes => {
            let poll = load_poll(&args.config)?;
            if poll.votes().is_empty() {
                warn!("run: the poll has no votes, nothing to export");
            }
            let rows = tally::vote_rows(&poll);
            run_export(&rows, &args.out, &args.reference)?;
        }
        Command::Import { input, legacy } => run_import(input, *legacy, &args.out)?,
    }
    Ok(())
}

fn run_validate_rut(ruts: &[String]) -> AdminResult<()> {
    let mut invalid: usize = 0;
    for raw in ruts.iter() {
        if rut::validate(raw) {
            println!("{}\tvalid\t{}", raw, rut::format(raw));
        } else {
            invalid += 1;
            println!("{}\tinvalid", raw);
        }
    }
    ensure!(invalid == 0, InvalidIdentifiersSnafu { count: invalid });
    Ok(())
}

fn run_format_rut(ruts: &[String]) {
    for raw in ruts.iter() {
        println!("{}", rut::format(raw));
    }
}

/// Reads the poll from the given file, or uses the default poll.
pub fn load_poll(config_path: &Option<String>) -> AdminResult<Poll> {
    let pf = match config_path {
        Some(path) => {
            info!("Attempting to read poll file {:?}", path);
            read_poll_file(path)?
        }
        None => {
            info!("No poll file given, using the default poll");
            PollFile::default()
        }
    };
    let poll = build_poll(&pf)?;
    info!(
        "poll: {:?} options: {:?} votes: {}",
        poll.question(),
        poll.options(),
        poll.votes().len()
    );
    Ok(poll)
}

fn run_export(
    rows: &[Record],
    out: &Option<String>,
    reference: &Option<String>,
) -> AdminResult<()> {
    let text = if rows.is_empty() {
        // Nothing to derive a header from: write an empty file.
        String::new()
    } else {
        csv_codec::encode(rows).context(CsvSnafu {})?
    };
    io_common::write_output(&text, out)?;

    // The reference file, if provided for comparison
    if let Some(reference_path) = reference {
        io_csv::check_reference(&text, reference_path)?;
    }
    Ok(())
}

fn run_import(input: &str, legacy: bool, out: &Option<String>) -> AdminResult<()> {
    let table = io_csv::read_csv_file(input, legacy)?;
    info!(
        "Read {} rows with columns {:?} from {:?}",
        table.rows.len(),
        table.columns,
        input
    );
    let js = io_common::table_to_json(&table);
    let pretty = serde_json::to_string_pretty(&js).context(WritingJsonSnafu {})?;
    debug!("run_import: {}", pretty);
    io_common::write_output(&(pretty + "\n"), out)
}
