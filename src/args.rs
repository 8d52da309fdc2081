use clap::{Parser, Subcommand};

/// This is the administration program for single-question polls.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file containing the poll and its votes. If not provided, an
    /// empty poll with the default question and options is used.
    /// For more information about the file format, read the manual of poll_core.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference CSV file. If provided, polladmin will check that the exported
    /// output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the exported CSV or the imported rows.
    /// Defaults to the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Checks the check digit of voter identifiers (RUT). Fails if any of them is invalid.
    ValidateRut {
        #[clap(value_parser, required = true)]
        ruts: Vec<String>,
    },
    /// Prints voter identifiers in the form 12.345.678-5, without validating them.
    FormatRut {
        #[clap(value_parser, required = true)]
        ruts: Vec<String>,
    },
    /// Prints a summary of the results.
    Summary,
    /// Exports the count and percentage of each option as CSV.
    ExportResults,
    /// Exports every recorded vote as CSV.
    ExportVotes,
    /// Reads a CSV file and prints its rows in JSON format.
    Import {
        /// (file path) The CSV file to read.
        #[clap(value_parser)]
        input: String,
        /// Use the line-based reader of older tools instead of the standard CSV rules.
        #[clap(long, takes_value = false)]
        legacy: bool,
    },
}
