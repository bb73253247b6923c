//! Round tracking, sampling, and outcome labeling for bombsight.
//!
//! This crate turns an ordered stream of decoded match events into an
//! ordered stream of labeled training records. Snapshots are captured about
//! once per simulated second while the bomb is planted, buffered until the
//! round's winner is known, then released in capture order.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `bombsight-config.yaml` into
//!   strongly-typed structs.
//! - [`feed`] -- [`DemoFeed`] and [`RosterSource`] traits plus the in-memory
//!   [`ScriptedFeed`].
//! - [`replay`] -- [`EventLogFeed`], a feed over recorded JSON Lines event logs.
//! - [`round`] -- [`RoundContext`], the per-round state machine.
//! - [`sampling`] -- [`Sampler`], the elapsed-time sampling decision and
//!   snapshot capture.
//! - [`buffer`] -- [`ResultBuffer`], holding partial results until the round
//!   resolves.
//! - [`scanner`] -- [`MatchScanner`], the lazy record iterator over a feed.
//!
//! [`DemoFeed`]: feed::DemoFeed
//! [`RosterSource`]: feed::RosterSource
//! [`ScriptedFeed`]: feed::ScriptedFeed
//! [`EventLogFeed`]: replay::EventLogFeed
//! [`RoundContext`]: round::RoundContext
//! [`Sampler`]: sampling::Sampler
//! [`ResultBuffer`]: buffer::ResultBuffer
//! [`MatchScanner`]: scanner::MatchScanner

pub mod buffer;
pub mod config;
pub mod feed;
pub mod replay;
pub mod round;
pub mod sampling;
pub mod scanner;
