//! Delimited output files.
//!
//! Every file is written to a `<name>.partial` sibling first and renamed
//! into place only once it is complete, so a file with the final name is
//! always a finished dataset. A failed write removes its staging file.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use bombsight_core::scanner::ScanError;
use bombsight_types::{TrainingRecord, column_names};
use tracing::{debug, warn};

use crate::error::EngineError;

/// Suffix appended to a file name while it is being written.
pub const STAGING_SUFFIX: &str = ".partial";

/// Rows and files combined by [`merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Source files whose rows were copied.
    pub files: usize,
    /// Data rows written, excluding the header.
    pub rows: u64,
}

/// Staging path for `dest`.
pub fn staging_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    name.push(STAGING_SUFFIX);
    dest.with_file_name(name)
}

/// Run `write` against the staging path of `dest`, then move the result
/// into place.
fn commit<T>(
    dest: &Path,
    write: impl FnOnce(&Path) -> Result<T, EngineError>,
) -> Result<T, EngineError> {
    let staging = staging_path(dest);
    match write(&staging) {
        Ok(value) => {
            std::fs::rename(&staging, dest)?;
            Ok(value)
        }
        Err(e) => {
            if let Err(cleanup) = std::fs::remove_file(&staging)
                && cleanup.kind() != std::io::ErrorKind::NotFound
            {
                warn!(
                    path = %staging.display(),
                    error = %cleanup,
                    "Failed to remove staging file"
                );
            }
            Err(e)
        }
    }
}

/// Write a header row and one row per record to `dest`.
///
/// Returns the number of records written. If any record is an error, no
/// file appears at `dest`.
pub fn write_records<I>(records: I, dest: &Path) -> Result<usize, EngineError>
where
    I: IntoIterator<Item = Result<TrainingRecord, ScanError>>,
{
    commit(dest, |staging| {
        let mut writer = csv::Writer::from_path(staging)?;
        writer.write_record(column_names())?;
        let mut count = 0_usize;
        for record in records {
            writer.write_record(record?.to_row())?;
            count = count.saturating_add(1);
        }
        writer.flush()?;
        Ok(count)
    })
}

/// Concatenate `sources` into `output`, keeping only the first header.
///
/// Empty sources are skipped. Every non-empty source must carry the same
/// header as the first one.
pub fn merge(sources: &[PathBuf], output: &Path) -> Result<MergeSummary, EngineError> {
    commit(output, |staging| {
        let mut writer = csv::Writer::from_path(staging)?;
        let mut header: Option<csv::StringRecord> = None;
        let mut summary = MergeSummary::default();
        let mut row = csv::StringRecord::new();

        for source in sources {
            let mut reader = csv::Reader::from_path(source)?;
            let headers = reader.headers()?.clone();
            if headers.is_empty() {
                warn!(path = %source.display(), "Skipping empty file");
                continue;
            }
            match &header {
                None => {
                    writer.write_record(&headers)?;
                    header = Some(headers);
                }
                Some(expected) if *expected != headers => {
                    return Err(EngineError::HeaderMismatch {
                        path: source.clone(),
                    });
                }
                Some(_) => {}
            }

            let mut rows = 0_u64;
            while reader.read_record(&mut row)? {
                writer.write_record(&row)?;
                rows = rows.saturating_add(1);
            }
            debug!(path = %source.display(), rows, "Merged file");
            summary.files = summary.files.saturating_add(1);
            summary.rows = summary.rows.saturating_add(rows);
        }

        writer.flush()?;
        Ok(summary)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bombsight_core::config::SamplingConfig;
    use bombsight_core::feed::ScriptedFeed;
    use bombsight_core::scanner::MatchScanner;
    use bombsight_types::{MatchEvent, Participant, Side};

    use super::*;

    fn roster() -> Vec<Participant> {
        [Side::CounterTerrorist, Side::Terrorist]
            .into_iter()
            .flat_map(|side| {
                (0..5).map(move |_| Participant {
                    name: String::from("p"),
                    side,
                    is_alive: true,
                    hp: 100,
                    armor: 0,
                    has_helmet: false,
                    has_defuse_kit: false,
                    active_weapon: None,
                    equipment_value: 800,
                })
            })
            .collect()
    }

    fn planted_round(feed: ScriptedFeed, ticks: u32, winner: Side) -> ScriptedFeed {
        feed.event(MatchEvent::PhaseStarted)
            .event(MatchEvent::ObjectivePlanted {
                site: 'B',
                actor: None,
            })
            .ticks(ticks)
            .event(MatchEvent::RoundEnded { winner })
    }

    fn scanner(feed: ScriptedFeed) -> MatchScanner<ScriptedFeed> {
        MatchScanner::new(feed, &SamplingConfig::default()).unwrap()
    }

    fn write_csv(path: &Path, contents: &str) {
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn staging_path_appends_suffix() {
        assert_eq!(
            staging_path(Path::new("/out/match_01.csv")),
            PathBuf::from("/out/match_01.csv.partial")
        );
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("match.csv");
        let feed = planted_round(
            ScriptedFeed::new("de_dust2", 0.0156).roster(roster()),
            130,
            Side::CounterTerrorist,
        );

        let written = write_records(scanner(feed), &dest).unwrap();

        assert_eq!(written, 2);
        assert!(!staging_path(&dest).exists());
        let mut reader = csv::Reader::from_path(&dest).unwrap();
        assert_eq!(reader.headers().unwrap().len(), column_names().len());
        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.first().and_then(|r| r.get(0)), Some("true"));
        assert_eq!(rows.first().and_then(|r| r.get(1)), Some("de_dust2"));
    }

    #[test]
    fn match_without_plants_still_gets_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("quiet.csv");
        let feed = ScriptedFeed::new("de_nuke", 0.0156)
            .event(MatchEvent::PhaseStarted)
            .ticks(10);

        assert_eq!(write_records(scanner(feed), &dest).unwrap(), 0);
        let contents = std::fs::read_to_string(&dest).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn failed_scan_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("broken.csv");
        let feed = planted_round(
            ScriptedFeed::new("de_dust2", 0.0156).roster(roster()),
            65,
            Side::Terrorist,
        )
        .fail("truncated");

        let result = write_records(scanner(feed), &dest);

        assert!(matches!(result, Err(EngineError::Scan { .. })));
        assert!(!dest.exists());
        assert!(!staging_path(&dest).exists());
    }

    #[test]
    fn merge_keeps_one_header() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        let empty = dir.path().join("empty.csv");
        write_csv(&a, "label,map\ntrue,de_dust2\nfalse,de_dust2\n");
        write_csv(&b, "label,map\ntrue,de_inferno\n");
        write_csv(&empty, "");
        let out = dir.path().join("merged.csv");

        let summary = merge(&[a, empty, b], &out).unwrap();

        assert_eq!(summary, MergeSummary { files: 2, rows: 3 });
        let merged = std::fs::read_to_string(&out).unwrap();
        assert_eq!(
            merged,
            "label,map\ntrue,de_dust2\nfalse,de_dust2\ntrue,de_inferno\n"
        );
    }

    #[test]
    fn merge_rejects_mismatched_headers() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        write_csv(&a, "label,map\ntrue,de_dust2\n");
        write_csv(&b, "label,round\ntrue,3\n");
        let out = dir.path().join("merged.csv");

        let result = merge(&[a, b.clone()], &out);

        assert!(matches!(
            result,
            Err(EngineError::HeaderMismatch { path }) if path == b
        ));
        assert!(!out.exists());
    }
}
