//! Feed over recorded replay event logs.
//!
//! An event log is a JSON Lines file produced by a replay decoder. The
//! first non-blank line is a [`LogHeader`]; every following non-blank line
//! is a [`LogLine`], either an event or a full roster replacement:
//!
//! ```text
//! {"map_id":"de_inferno","tick_rate":64.0}
//! {"event":{"type":"phase_started"}}
//! {"roster":[{"side":"terrorist","is_alive":true,"hp":100}, ...]}
//! {"event":{"type":"tick_advanced"}}
//! ```
//!
//! Lines are decoded lazily as the scanner pulls events, so a corrupt line
//! surfaces as a [`FeedError`] at the point it is reached.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use bombsight_types::{MatchEvent, Participant};
use serde::{Deserialize, Serialize};

use crate::feed::{DemoFeed, FeedError, RosterSource};

/// First line of an event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogHeader {
    /// Map identifier.
    pub map_id: String,
    /// Ticks per simulated second.
    pub tick_rate: f64,
}

/// Any line after the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLine {
    /// A match event.
    Event(MatchEvent),
    /// The full roster as of this point in the replay.
    Roster(Vec<Participant>),
}

/// A [`DemoFeed`] reading a JSON Lines event log.
#[derive(Debug)]
pub struct EventLogFeed<R> {
    reader: R,
    header: LogHeader,
    seconds_per_tick: f64,
    roster: Vec<Participant>,
    line_number: usize,
    buf: String,
    failed: bool,
}

impl EventLogFeed<BufReader<File>> {
    /// Open an event log on disk and read its header.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Io`] if the file cannot be opened, or any error
    /// [`EventLogFeed::from_reader`] returns for the header.
    pub fn open(path: &Path) -> Result<Self, FeedError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: BufRead> EventLogFeed<R> {
    /// Wrap a reader and read the header line.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::MissingHeader`] for an empty source,
    /// [`FeedError::Malformed`] if the header does not decode, and
    /// [`FeedError::InvalidTickRate`] if the tick rate is not a positive,
    /// finite number.
    pub fn from_reader(reader: R) -> Result<Self, FeedError> {
        let mut feed = Self {
            reader,
            header: LogHeader {
                map_id: String::new(),
                tick_rate: 0.0,
            },
            seconds_per_tick: 0.0,
            roster: Vec::new(),
            line_number: 0,
            buf: String::new(),
            failed: false,
        };

        if !feed.read_line()? {
            return Err(FeedError::MissingHeader);
        }
        let header: LogHeader =
            serde_json::from_str(feed.buf.trim()).map_err(|e| FeedError::Malformed {
                line: feed.line_number,
                reason: format!("invalid header: {e}"),
            })?;

        if !header.tick_rate.is_finite() || header.tick_rate <= 0.0 {
            return Err(FeedError::InvalidTickRate {
                tick_rate: header.tick_rate,
            });
        }

        feed.seconds_per_tick = header.tick_rate.recip();
        feed.header = header;
        Ok(feed)
    }

    /// The decoded header.
    pub const fn header(&self) -> &LogHeader {
        &self.header
    }

    /// Read the next non-blank line into `buf`. Returns `false` at end of input.
    fn read_line(&mut self) -> Result<bool, FeedError> {
        loop {
            self.buf.clear();
            let read = self.reader.read_line(&mut self.buf)?;
            if read == 0 {
                return Ok(false);
            }
            self.line_number = self.line_number.saturating_add(1);
            if !self.buf.trim().is_empty() {
                return Ok(true);
            }
        }
    }

    fn next_line(&mut self) -> Result<Option<LogLine>, FeedError> {
        if !self.read_line()? {
            return Ok(None);
        }
        serde_json::from_str(self.buf.trim())
            .map(Some)
            .map_err(|e| FeedError::Malformed {
                line: self.line_number,
                reason: e.to_string(),
            })
    }
}

impl<R> RosterSource for EventLogFeed<R> {
    fn current_roster(&self) -> &[Participant] {
        &self.roster
    }
}

impl<R: BufRead> DemoFeed for EventLogFeed<R> {
    fn map_id(&self) -> &str {
        &self.header.map_id
    }

    fn seconds_per_tick(&self) -> f64 {
        self.seconds_per_tick
    }

    fn next_event(&mut self) -> Option<Result<MatchEvent, FeedError>> {
        if self.failed {
            return None;
        }
        loop {
            match self.next_line() {
                Ok(Some(LogLine::Roster(participants))) => self.roster = participants,
                Ok(Some(LogLine::Event(event))) => return Some(Ok(event)),
                Ok(None) => return None,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::io::Cursor;

    use bombsight_types::Side;

    use super::*;

    const LOG: &str = r#"{"map_id":"de_inferno","tick_rate":64.0}
{"event":{"type":"phase_started"}}

{"roster":[{"side":"terrorist","is_alive":true,"hp":100,"active_weapon":"AK47"}]}
{"event":{"type":"objective_planted","site":"A","actor":"s1mple"}}
{"event":{"type":"round_ended","winner":"counter_terrorist"}}
"#;

    #[test]
    fn reads_header_and_events() {
        let mut feed = EventLogFeed::from_reader(Cursor::new(LOG)).unwrap();
        assert_eq!(feed.map_id(), "de_inferno");
        assert!((feed.seconds_per_tick() - 0.015_625).abs() < f64::EPSILON);

        assert_eq!(feed.next_event().unwrap().unwrap(), MatchEvent::PhaseStarted);
        assert!(feed.current_roster().is_empty());

        let planted = feed.next_event().unwrap().unwrap();
        assert_eq!(planted.kind(), "objective_planted");
        assert_eq!(feed.current_roster().len(), 1);
        assert_eq!(
            feed.current_roster().first().map(|p| p.side),
            Some(Side::Terrorist)
        );

        assert_eq!(
            feed.next_event().unwrap().unwrap(),
            MatchEvent::RoundEnded {
                winner: Side::CounterTerrorist
            }
        );
        assert!(feed.next_event().is_none());
    }

    #[test]
    fn empty_source_has_no_header() {
        let result = EventLogFeed::from_reader(Cursor::new("\n\n"));
        assert!(matches!(result, Err(FeedError::MissingHeader)));
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let result = EventLogFeed::from_reader(Cursor::new(
            r#"{"map_id":"de_nuke","tick_rate":0.0}"#,
        ));
        assert!(matches!(result, Err(FeedError::InvalidTickRate { .. })));
    }

    #[test]
    fn malformed_line_reports_line_number_and_stops() {
        let log = "{\"map_id\":\"de_nuke\",\"tick_rate\":128.0}\n\
                   {\"event\":{\"type\":\"phase_started\"}}\n\
                   {\"event\":{\"type\":\"teleported\"}}\n\
                   {\"event\":{\"type\":\"phase_started\"}}\n";
        let mut feed = EventLogFeed::from_reader(Cursor::new(log)).unwrap();
        assert!(feed.next_event().unwrap().is_ok());
        match feed.next_event() {
            Some(Err(FeedError::Malformed { line, .. })) => assert_eq!(line, 3),
            other => panic!("expected malformed line, got {other:?}"),
        }
        assert!(feed.next_event().is_none());
    }

    #[test]
    fn open_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match.jsonl");
        std::fs::write(&path, LOG).unwrap();
        let feed = EventLogFeed::open(&path).unwrap();
        assert_eq!(feed.header().map_id, "de_inferno");
    }

    #[test]
    fn log_lines_round_trip_through_serde() {
        let line = LogLine::Event(MatchEvent::ObjectiveExploded);
        let json = serde_json::to_string(&line).unwrap();
        assert_eq!(json, r#"{"event":{"type":"objective_exploded"}}"#);
    }
}
