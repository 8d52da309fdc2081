// ********* Tabular data structures ***********

use snafu::Snafu;
use std::fmt::Display;

/// One row of exported or imported data.
///
/// The fields keep their insertion order, which is also the column order
/// used when the record is the first of an encoded sequence.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Record {
        Record { fields: Vec::new() }
    }

    /// Sets the value of a field.
    ///
    /// An existing field keeps its position and only sees its value replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The value of a field, or the empty string when the field is missing.
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut r = Record::new();
        for (k, v) in iter {
            r.insert(k, v);
        }
        r
    }
}

/// A header and the records that follow it.
///
/// Every record is read against `columns`: fields missing from a record
/// are treated as empty, extra fields are ignored.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

/// Errors from the CSV encoder and decoders.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CodecError {
    /// No record was given, so no header can be derived.
    #[snafu(display("cannot encode an empty sequence of records"))]
    EmptyInput {},
    /// The text could not be split into a header and rows.
    #[snafu(display("malformed CSV: {message}"))]
    ParseFailure { message: String },
}

// ********* Poll data structures ***********

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 10;

pub const DEFAULT_QUESTION: &str = "¿Cuál es tu opción preferida?";
pub const DEFAULT_OPTIONS: [&str; 3] = ["Opción 1", "Opción 2", "Opción 3"];

/// The lifecycle state of a poll. Only an active poll accepts votes.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum PollStatus {
    #[default]
    Active,
    Paused,
    Finished,
}

impl PollStatus {
    /// The label stored by the browser console.
    pub fn label(&self) -> &'static str {
        match self {
            PollStatus::Active => "activa",
            PollStatus::Paused => "pausada",
            PollStatus::Finished => "finalizada",
        }
    }

    pub fn from_label(label: &str) -> Option<PollStatus> {
        match label.trim() {
            "activa" => Some(PollStatus::Active),
            "pausada" => Some(PollStatus::Paused),
            "finalizada" => Some(PollStatus::Finished),
            _ => None,
        }
    }
}

impl Display for PollStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A recorded vote.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Vote {
    /// The voter identifier, as it was recorded.
    pub rut: String,
    /// Position of the chosen option in the poll. It may point outside of
    /// the current options if these changed after the vote was cast.
    pub option_index: usize,
    pub date: String,
    pub ip: Option<String>,
}

/// Errors when configuring a poll or casting a vote.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PollError {
    #[snafu(display("the question cannot be empty"))]
    EmptyQuestion {},
    #[snafu(display("at least {} options are required, got {}", MIN_OPTIONS, count))]
    TooFewOptions { count: usize },
    #[snafu(display("at most {} options are allowed, got {}", MAX_OPTIONS, count))]
    TooManyOptions { count: usize },
    #[snafu(display("invalid voter identifier {rut:?}"))]
    InvalidIdentifier { rut: String },
    #[snafu(display("option {index} does not exist (the poll has {available} options)"))]
    UnknownOption { index: usize, available: usize },
    #[snafu(display("the poll is {status} and does not accept votes"))]
    PollClosed { status: PollStatus },
}

// ******** Output data structures *********

/// Tally for a single option.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct OptionTally {
    pub name: String,
    pub count: u64,
    /// Rounded share of the total, between 0 and 100.
    pub percent: u64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PollResult {
    pub question: String,
    pub options: Vec<OptionTally>,
    /// Votes that landed on one of the options.
    pub total_votes: u64,
    /// Distinct voter identifiers among all recorded votes.
    pub participants: usize,
}
