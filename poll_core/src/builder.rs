pub use crate::config::*;
use crate::poll::Poll;
use crate::rut;

/// A builder for setting up a poll and its votes.
///
/// ```
/// use poll_core::builder::Builder;
/// # use poll_core::PollError;
///
/// let mut builder = Builder::new("¿Cuál es tu opción preferida?")?
///     .options(&["Té".to_string(), "Café".to_string()])?;
///
/// builder.add_vote("12.345.678-5", 1)?;
/// builder.add_vote_at("7.654.321-6", 0, "2024-05-01T10:00:00Z", Some("10.0.0.1"))?;
///
/// let poll = builder.build()?;
/// assert_eq!(poll.votes().len(), 2);
///
/// # Ok::<(), PollError>(())
/// ```
pub struct Builder {
    pub(crate) _question: String,
    pub(crate) _options: Vec<String>,
    pub(crate) _status: PollStatus,
    pub(crate) _votes: Vec<Vote>,
}

impl Builder {
    pub fn new(question: &str) -> Result<Builder, PollError> {
        if question.trim().is_empty() {
            return Err(PollError::EmptyQuestion {});
        }
        Ok(Builder {
            _question: question.to_string(),
            _options: Vec::new(),
            _status: PollStatus::Active,
            _votes: Vec::new(),
        })
    }

    pub fn options(self, opts: &[String]) -> Result<Builder, PollError> {
        // Checked here so that errors show up where the options are given.
        Poll::new(&self._question, opts)?;
        Ok(Builder {
            _options: opts.to_vec(),
            _votes: Vec::new(),
            ..self
        })
    }

    /// The status of the built poll. Votes added to the builder are
    /// recorded before the status applies.
    pub fn status(self, status: PollStatus) -> Builder {
        Builder {
            _status: status,
            ..self
        }
    }

    /// Adds a vote without date or address.
    pub fn add_vote(&mut self, voter: &str, option_index: usize) -> Result<(), PollError> {
        self.add_vote_at(voter, option_index, "", None)
    }

    pub fn add_vote_at(
        &mut self,
        voter: &str,
        option_index: usize,
        date: &str,
        ip: Option<&str>,
    ) -> Result<(), PollError> {
        if !rut::validate(voter) {
            return Err(PollError::InvalidIdentifier {
                rut: voter.to_string(),
            });
        }
        self._votes.push(Vote {
            rut: voter.to_string(),
            option_index,
            date: date.to_string(),
            ip: ip.map(|s| s.to_string()),
        });
        Ok(())
    }

    pub fn build(self) -> Result<Poll, PollError> {
        let mut poll = if self._options.is_empty() {
            let mut p = Poll::default();
            let defaults = p.options().to_vec();
            p.configure(&self._question, &defaults)?;
            p
        } else {
            Poll::new(&self._question, &self._options)?
        };
        for v in self._votes.iter() {
            poll.cast_vote(&v.rut, v.option_index, &v.date, v.ip.as_deref())?;
        }
        poll.status = self._status;
        Ok(poll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_default_options() {
        let poll = Builder::new("¿Sí o no?").unwrap().build().unwrap();
        assert_eq!(poll.question(), "¿Sí o no?");
        assert_eq!(poll.options().len(), 3);
    }

    #[test]
    fn rejects_bad_votes() {
        let mut builder = Builder::new("q")
            .unwrap()
            .options(&["a".to_string(), "b".to_string()])
            .unwrap();
        assert!(builder.add_vote("1-1", 0).is_err());
        builder.add_vote("12345678-5", 2).unwrap();
        assert_eq!(
            builder.build(),
            Err(PollError::UnknownOption {
                index: 2,
                available: 2
            })
        );
    }

    #[test]
    fn status_applies_after_votes() {
        let mut builder = Builder::new("q")
            .unwrap()
            .options(&["a".to_string(), "b".to_string()])
            .unwrap()
            .status(PollStatus::Finished);
        builder.add_vote("12345678-5", 0).unwrap();
        let poll = builder.build().unwrap();
        assert_eq!(poll.status, PollStatus::Finished);
        assert_eq!(poll.votes()[0].rut, "12.345.678-5");
    }

    #[test]
    fn options_are_checked_early() {
        assert!(matches!(
            Builder::new("q").unwrap().options(&["solo".to_string()]),
            Err(PollError::TooFewOptions { count: 1 })
        ));
        assert!(Builder::new(" ").is_err());
    }
}
