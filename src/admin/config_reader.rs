use crate::admin::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

/// The poll as stored by the browser console.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollFile {
    #[serde(rename = "pregunta")]
    pub question: Option<String>,
    #[serde(rename = "opciones")]
    pub options: Option<Vec<String>>,
    #[serde(rename = "fechaInicio")]
    pub start_date: Option<String>,
    #[serde(rename = "fechaFin")]
    pub end_date: Option<String>,
    #[serde(rename = "estado")]
    pub status: Option<String>,
    #[serde(rename = "votos", default)]
    pub votes: Vec<StoredVote>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StoredVote {
    #[serde(default)]
    pub rut: String,
    // Number or string, as written by the console.
    #[serde(rename = "opcionIndex")]
    _option_index: Option<JSValue>,
    #[serde(rename = "fecha")]
    pub date: Option<String>,
    pub ip: Option<String>,
}

impl StoredVote {
    pub fn option_index(&self) -> Option<usize> {
        read_js_int(&self._option_index)
    }
}

pub fn read_poll_file(path: &str) -> AdminResult<PollFile> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let pf: PollFile = serde_json::from_str(&contents).context(ParsingJsonSnafu { path })?;
    debug!("read_poll_file: {:?}", pf);
    Ok(pf)
}

pub fn build_poll(pf: &PollFile) -> AdminResult<Poll> {
    let defaults = Poll::default();
    let question = pf
        .question
        .clone()
        .unwrap_or_else(|| defaults.question().to_string());
    let options = match &pf.options {
        Some(opts) if !opts.is_empty() => opts.clone(),
        _ => defaults.options().to_vec(),
    };
    let mut poll = Poll::new(&question, &options).context(InvalidPollSnafu {})?;

    poll.status = match &pf.status {
        Some(label) => PollStatus::from_label(label).context(UnknownStatusSnafu {
            status: label.clone(),
        })?,
        None => PollStatus::Active,
    };
    poll.start_date = pf.start_date.clone();
    poll.end_date = pf.end_date.clone();

    let mut votes: Vec<Vote> = Vec::new();
    for (idx, sv) in pf.votes.iter().enumerate() {
        let option_index = match sv.option_index() {
            Some(x) => x,
            None => {
                warn!(
                    "build_poll: vote #{} ({}) has no usable option index {:?}, skipping",
                    idx + 1,
                    sv.rut,
                    sv._option_index
                );
                continue;
            }
        };
        if !rut::validate(&sv.rut) {
            warn!("build_poll: vote #{} has an invalid identifier {:?}", idx + 1, sv.rut);
        }
        votes.push(Vote {
            rut: sv.rut.clone(),
            option_index,
            date: sv.date.clone().unwrap_or_default(),
            ip: sv.ip.clone(),
        });
    }
    poll.restore_votes(votes);
    Ok(poll)
}

fn read_js_int(x: &Option<JSValue>) -> Option<usize> {
    match x {
        Some(JSValue::Number(n)) => n.as_u64().map(|x| x as usize),
        Some(JSValue::String(s)) => s.trim().parse::<usize>().ok(),
        _ => None,
    }
}
