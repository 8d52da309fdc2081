use log::{debug, info};
use std::collections::HashSet;

use crate::config::*;
use crate::poll::Poll;

// Column names of the exported files.
pub const COL_OPTION: &str = "Opción";
pub const COL_VOTES: &str = "Votos";
pub const COL_PERCENT: &str = "Porcentaje";
pub const COL_ID: &str = "ID";
pub const COL_RUT: &str = "RUT";
pub const COL_DATE: &str = "Fecha";
pub const COL_IP: &str = "Dirección IP";

const UNKNOWN_OPTION: &str = "Desconocida";
const MISSING_IP: &str = "No disponible";
const BAR_WIDTH: u64 = 20;

/// Number of votes for each option, in option order.
///
/// Votes pointing outside of the options are not counted.
pub fn count_votes(poll: &Poll) -> Vec<u64> {
    let mut counts = vec![0u64; poll.options().len()];
    for v in poll.votes().iter() {
        match counts.get_mut(v.option_index) {
            Some(c) => *c += 1,
            None => debug!(
                "count_votes: skipping vote of {} for option {}",
                v.rut, v.option_index
            ),
        }
    }
    counts
}

/// Number of distinct identifiers that voted.
pub fn unique_participants(poll: &Poll) -> usize {
    let ruts: HashSet<&str> = poll.votes().iter().map(|v| v.rut.as_str()).collect();
    ruts.len()
}

/// Share of `count` in `total`, in percent, rounded half up.
pub fn percentage(count: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (200 * count + total) / (2 * total)
}

/// Tallies the votes of a poll.
pub fn tally(poll: &Poll) -> PollResult {
    let counts = count_votes(poll);
    let total_votes: u64 = counts.iter().sum();
    let options: Vec<OptionTally> = poll
        .options()
        .iter()
        .zip(counts.iter())
        .map(|(name, count)| OptionTally {
            name: name.clone(),
            count: *count,
            percent: percentage(*count, total_votes),
        })
        .collect();
    let participants = unique_participants(poll);
    info!(
        "tally: {} votes from {} participants over {} options",
        total_votes,
        participants,
        options.len()
    );
    PollResult {
        question: poll.question().to_string(),
        options,
        total_votes,
        participants,
    }
}

/// One record per option, with its count and its share of the votes.
pub fn results_rows(result: &PollResult) -> Vec<Record> {
    result
        .options
        .iter()
        .map(|o| {
            let mut r = Record::new();
            r.insert(COL_OPTION, o.name.clone());
            r.insert(COL_VOTES, o.count.to_string());
            r.insert(COL_PERCENT, format!("{}%", o.percent));
            r
        })
        .collect()
}

/// One record per recorded vote, numbered from 1.
pub fn vote_rows(poll: &Poll) -> Vec<Record> {
    poll.votes()
        .iter()
        .enumerate()
        .map(|(idx, v)| {
            let option = poll
                .options()
                .get(v.option_index)
                .map(|s| s.as_str())
                .unwrap_or(UNKNOWN_OPTION);
            let mut r = Record::new();
            r.insert(COL_ID, (idx + 1).to_string());
            r.insert(COL_RUT, v.rut.clone());
            r.insert(COL_OPTION, option);
            r.insert(COL_DATE, v.date.clone());
            r.insert(
                COL_IP,
                v.ip.clone()
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| MISSING_IP.to_string()),
            );
            r
        })
        .collect()
}

/// A plain-text report of the results.
pub fn summary_text(result: &PollResult) -> String {
    let mut lines: Vec<String> = vec![
        "Resumen de Votación".to_string(),
        format!("Pregunta: {}", result.question),
    ];
    if result.total_votes == 0 {
        lines.push("No hay votos registrados aún.".to_string());
    } else {
        let width = result
            .options
            .iter()
            .map(|o| o.name.chars().count())
            .max()
            .unwrap_or(0);
        for o in result.options.iter() {
            let filled = (o.percent.min(100) * BAR_WIDTH / 100) as usize;
            let pad = width - o.name.chars().count();
            lines.push(format!(
                "  {}:{} [{}{}] {:>3}% {} votos",
                o.name,
                " ".repeat(pad),
                "#".repeat(filled),
                ".".repeat(BAR_WIDTH as usize - filled),
                o.percent,
                o.count
            ));
        }
    }
    lines.push(format!(
        "Total de votos: {} / Participantes: {}",
        result.total_votes, result.participants
    ));
    lines.join("\n") + "\n"
}
