use log::{debug, info, warn};
use snafu::ensure;

use crate::config::*;
use crate::rut;

/// A single-question poll and the votes recorded for it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Poll {
    question: String,
    options: Vec<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: PollStatus,
    votes: Vec<Vote>,
}

impl Default for Poll {
    fn default() -> Self {
        Poll {
            question: DEFAULT_QUESTION.to_string(),
            options: DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect(),
            start_date: None,
            end_date: None,
            status: PollStatus::Active,
            votes: Vec::new(),
        }
    }
}

impl Poll {
    /// Creates an active poll without votes.
    ///
    /// The question and the options are trimmed. Empty options are dropped
    /// before the number of options is checked.
    pub fn new(question: &str, options: &[String]) -> Result<Poll, PollError> {
        let mut poll = Poll {
            question: String::new(),
            options: Vec::new(),
            ..Poll::default()
        };
        poll.configure(question, options)?;
        Ok(poll)
    }

    /// Replaces the question and the options.
    ///
    /// Recorded votes are kept as they are: they still point to option
    /// positions, which may now name different options or none at all.
    pub fn configure(&mut self, question: &str, options: &[String]) -> Result<(), PollError> {
        let question = question.trim();
        ensure!(!question.is_empty(), EmptyQuestionSnafu {});
        let options: Vec<String> = options
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        ensure!(
            options.len() >= MIN_OPTIONS,
            TooFewOptionsSnafu {
                count: options.len()
            }
        );
        ensure!(
            options.len() <= MAX_OPTIONS,
            TooManyOptionsSnafu {
                count: options.len()
            }
        );
        if !self.votes.is_empty() && options.len() < self.options.len() {
            warn!(
                "configure: {} options removed while {} votes are recorded",
                self.options.len() - options.len(),
                self.votes.len()
            );
        }
        info!("configure: question: {:?} options: {:?}", question, options);
        self.question = question.to_string();
        self.options = options;
        Ok(())
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    /// Records a vote.
    ///
    /// The identifier must be valid and is stored in its formatted form.
    /// The poll must be active and the option must exist.
    pub fn cast_vote(
        &mut self,
        voter: &str,
        option_index: usize,
        date: &str,
        ip: Option<&str>,
    ) -> Result<&Vote, PollError> {
        ensure!(
            self.status == PollStatus::Active,
            PollClosedSnafu {
                status: self.status
            }
        );
        ensure!(
            option_index < self.options.len(),
            UnknownOptionSnafu {
                index: option_index,
                available: self.options.len()
            }
        );
        let rut = match rut::Rut::parse(voter) {
            Some(r) => r,
            None => {
                return InvalidIdentifierSnafu { rut: voter }.fail();
            }
        };
        debug!("cast_vote: {} -> option {}", rut, option_index);
        self.votes.push(Vote {
            rut: rut.to_string(),
            option_index,
            date: date.to_string(),
            ip: ip.map(|s| s.to_string()),
        });
        let idx = self.votes.len() - 1;
        Ok(&self.votes[idx])
    }

    /// Adds votes that were recorded earlier, without checking them again.
    pub fn restore_votes(&mut self, votes: Vec<Vote>) {
        debug!("restore_votes: {} votes", votes.len());
        self.votes.extend(votes);
    }

    /// Removes every vote and returns how many were removed.
    pub fn clear_votes(&mut self) -> usize {
        let n = self.votes.len();
        self.votes.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_poll() {
        let poll = Poll::default();
        assert_eq!(poll.question(), "¿Cuál es tu opción preferida?");
        assert_eq!(poll.options(), names(&["Opción 1", "Opción 2", "Opción 3"]));
        assert_eq!(poll.status, PollStatus::Active);
    }

    #[test]
    fn configure_trims_and_drops_empty_options() {
        let poll = Poll::new("  ¿Té o café? ", &names(&[" Té", "", "   ", "Café "])).unwrap();
        assert_eq!(poll.question(), "¿Té o café?");
        assert_eq!(poll.options(), names(&["Té", "Café"]));
    }

    #[test]
    fn configure_checks_bounds() {
        assert_eq!(
            Poll::new("  ", &names(&["a", "b"])),
            Err(PollError::EmptyQuestion {})
        );
        assert_eq!(
            Poll::new("q", &names(&["a", " "])),
            Err(PollError::TooFewOptions { count: 1 })
        );
        let eleven: Vec<String> = (1..=11).map(|i| format!("Opción {}", i)).collect();
        assert_eq!(
            Poll::new("q", &eleven),
            Err(PollError::TooManyOptions { count: 11 })
        );
        assert!(Poll::new("q", &eleven[..10]).is_ok());
    }

    #[test]
    fn cast_vote_formats_identifier() {
        let mut poll = Poll::default();
        let v = poll
            .cast_vote("123456785", 1, "2024-05-01T10:00:00Z", None)
            .unwrap();
        assert_eq!(v.rut, "12.345.678-5");
        assert_eq!(v.option_index, 1);
        assert_eq!(poll.votes().len(), 1);
    }

    #[test]
    fn cast_vote_rejections() {
        let mut poll = Poll::default();
        assert_eq!(
            poll.cast_vote("12345678-4", 0, "", None),
            Err(PollError::InvalidIdentifier {
                rut: "12345678-4".to_string()
            })
        );
        assert_eq!(
            poll.cast_vote("12345678-5", 3, "", None),
            Err(PollError::UnknownOption {
                index: 3,
                available: 3
            })
        );
        poll.status = PollStatus::Finished;
        assert_eq!(
            poll.cast_vote("12345678-5", 0, "", None),
            Err(PollError::PollClosed {
                status: PollStatus::Finished
            })
        );
        assert!(poll.votes().is_empty());
    }

    #[test]
    fn reconfigure_keeps_votes() {
        let mut poll = Poll::default();
        poll.cast_vote("12345678-5", 2, "", Some("10.0.0.1")).unwrap();
        poll.configure("Otra", &names(&["A", "B"])).unwrap();
        assert_eq!(poll.votes().len(), 1);
        assert_eq!(poll.clear_votes(), 1);
        assert!(poll.votes().is_empty());
    }
}
