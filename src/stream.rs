//! CSV match stream.
//!
//! Reads an A/B match table one row at a time, validates each row and
//! verifies that match dates never go backwards. Unsorted input would
//! silently produce order-dependent ratings, so an ordering violation is
//! always fatal, whatever the policy for malformed rows.

use crate::error::{EloError, Result};
use crate::record::{ContestRecord, MatchRow};
use chrono::NaiveDate;
use csv::{Reader, ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use log::warn;
use std::io::Read;

/// Columns every input table must have.
pub const REQUIRED_COLUMNS: [&str; 4] =
    ["tourney_date", "player_a_name", "player_b_name", "player_a_win"];

/// Column holding the context tag.
pub const SURFACE_COLUMN: &str = "surface";

/// What to do with a row that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidRowPolicy {
    /// Stop at the first malformed row.
    #[default]
    Fail,

    /// Log the row at warn level, count it and continue.
    Skip,
}

/// A validated row: the raw fields plus the parsed record.
#[derive(Debug, Clone)]
pub struct StreamedMatch {
    /// 1-indexed line number, counting the header as line 1
    pub row: usize,

    /// Raw trimmed fields, in header order
    pub fields: StringRecord,

    /// Parsed record
    pub record: ContestRecord,
}

/// Single forward pass over a CSV match table.
pub struct MatchStream<R> {
    headers: StringRecord,
    rows: StringRecordsIntoIter<R>,
    require_context: bool,
    policy: InvalidRowPolicy,
    last_date: Option<NaiveDate>,
    rows_read: usize,
    rows_skipped: usize,
    finished: bool,
}

impl<R: Read> MatchStream<R> {
    /// Opens a stream over `reader`, checking the header for required
    /// columns. `surface` is required when `require_context` is set.
    pub fn new(reader: R, require_context: bool, policy: InvalidRowPolicy) -> Result<Self> {
        let mut csv_reader: Reader<R> = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let mut required: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        if require_context {
            required.push(SURFACE_COLUMN);
        }
        for column in required {
            if !headers.iter().any(|h| h == column) {
                return Err(EloError::MissingColumn {
                    column: column.to_string(),
                });
            }
        }

        Ok(MatchStream {
            headers,
            rows: csv_reader.into_records(),
            require_context,
            policy,
            last_date: None,
            rows_read: 0,
            rows_skipped: 0,
            finished: false,
        })
    }

    /// Header row of the input table.
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// Data rows read so far, including skipped ones.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Rows dropped under [`InvalidRowPolicy::Skip`].
    pub fn rows_skipped(&self) -> usize {
        self.rows_skipped
    }

    fn parse_row(&self, row: usize, fields: &StringRecord) -> Result<ContestRecord> {
        let raw: MatchRow = fields.deserialize(Some(&self.headers))?;
        raw.parse(row, self.require_context)
    }

    fn check_order(&mut self, row: usize, date: NaiveDate) -> Result<()> {
        if let Some(previous) = self.last_date {
            if date < previous {
                return Err(EloError::OutOfOrder {
                    row,
                    previous,
                    current: date,
                });
            }
        }
        self.last_date = Some(date);
        Ok(())
    }
}

/// Returns `true` for errors confined to one row. Read failures are not:
/// the reader cannot continue past them.
fn is_row_error(err: &EloError) -> bool {
    match err {
        EloError::InvalidRecord { .. } => true,
        EloError::Csv(e) => !matches!(e.kind(), csv::ErrorKind::Io(_)),
        _ => false,
    }
}

impl<R: Read> Iterator for MatchStream<R> {
    type Item = Result<StreamedMatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let next = self.rows.next()?;
            self.rows_read += 1;
            let row = self.rows_read + 1; // 1-indexed, accounting for header row

            let parsed = next
                .map_err(EloError::from)
                .and_then(|fields| self.parse_row(row, &fields).map(|record| (fields, record)));

            let (fields, record) = match parsed {
                Ok(ok) => ok,
                Err(e) if self.policy == InvalidRowPolicy::Skip && is_row_error(&e) => {
                    warn!("Row {}: {}, skipping", row, e);
                    self.rows_skipped += 1;
                    continue;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            };

            if let Err(e) = self.check_order(row, record.date) {
                self.finished = true;
                return Some(Err(e));
            }

            return Some(Ok(StreamedMatch {
                row,
                fields,
                record,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Outcome;
    use std::io::{self, Cursor};

    /// Yields `data`, then fails every later read.
    struct FailingReader {
        data: Cursor<&'static str>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::Other, "disk went away")),
                n => Ok(n),
            }
        }
    }

    fn stream(csv: &str, policy: InvalidRowPolicy) -> MatchStream<Cursor<&str>> {
        MatchStream::new(Cursor::new(csv), true, policy).unwrap()
    }

    #[test]
    fn test_reads_rows_in_order() {
        let csv = r#"tourney_date,surface,player_a_name,player_b_name,player_a_win
20190107,HARD,Novak Djokovic,Andy Murray,1
20190107,HARD,Roger Federer,Novak Djokovic,0
20190114,CLAY,Andy Murray,Roger Federer,1"#;

        let matches: Vec<_> = stream(csv, InvalidRowPolicy::Fail)
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].row, 2);
        assert_eq!(matches[1].record.player_a, "Roger Federer");
        assert_eq!(matches[1].record.outcome, Outcome::BWon);
        assert_eq!(matches[2].record.context.as_deref(), Some("CLAY"));
    }

    #[test]
    fn test_extra_columns_pass_through() {
        let csv = r#"round,tourney_date,surface,player_a_name,player_b_name,player_a_win,best_of
F,20190107,HARD,A,B,1,5"#;

        let mut s = stream(csv, InvalidRowPolicy::Fail);
        assert_eq!(s.headers().len(), 7);

        let m = s.next().unwrap().unwrap();
        assert_eq!(&m.fields[0], "F");
        assert_eq!(&m.fields[6], "5");
        assert!(s.next().is_none());
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let csv = r#"tourney_date, surface, player_a_name, player_b_name, player_a_win
 20190107 , HARD ,  A , B , 1 "#;

        let m = stream(csv, InvalidRowPolicy::Fail).next().unwrap().unwrap();
        assert_eq!(m.record.player_a, "A");
        assert_eq!(m.record.context.as_deref(), Some("HARD"));
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let csv = "tourney_date,player_a_name,player_b_name,player_a_win\n20190107,A,B,1\n";

        let err = MatchStream::new(Cursor::new(csv), true, InvalidRowPolicy::Fail)
            .err()
            .unwrap();
        assert!(matches!(err, EloError::MissingColumn { ref column } if column == "surface"));

        assert!(MatchStream::new(Cursor::new(csv), false, InvalidRowPolicy::Fail).is_ok());
    }

    #[test]
    fn test_out_of_order_dates_are_fatal() {
        let csv = r#"tourney_date,surface,player_a_name,player_b_name,player_a_win
20190114,HARD,A,B,1
20190107,HARD,A,B,1
20190121,HARD,A,B,1"#;

        let mut s = stream(csv, InvalidRowPolicy::Skip);
        assert!(s.next().unwrap().is_ok());
        match s.next().unwrap() {
            Err(EloError::OutOfOrder { row, .. }) => assert_eq!(row, 3),
            other => panic!("Expected OutOfOrder, got {:?}", other),
        }
        assert!(s.next().is_none());
    }

    #[test]
    fn test_malformed_row_fails_by_default() {
        let csv = r#"tourney_date,surface,player_a_name,player_b_name,player_a_win
20190107,HARD,A,,1
20190108,HARD,A,B,1"#;

        let mut s = stream(csv, InvalidRowPolicy::Fail);
        assert!(matches!(
            s.next().unwrap(),
            Err(EloError::InvalidRecord { row: 2, .. })
        ));
        assert!(s.next().is_none());
    }

    #[test]
    fn test_skip_policy_counts_dropped_rows() {
        let csv = r#"tourney_date,surface,player_a_name,player_b_name,player_a_win
20190107,HARD,A,B,1
20190107,HARD,A,B,maybe
not-a-date,HARD,A,B,1
20190108,,A,B,1
20190109,HARD,A,B,0"#;

        let mut s = stream(csv, InvalidRowPolicy::Skip);
        let rows: Vec<usize> = s.by_ref().map(|m| m.unwrap().row).collect();

        assert_eq!(rows, vec![2, 6]);
        assert_eq!(s.rows_read(), 5);
        assert_eq!(s.rows_skipped(), 3);
    }

    #[test]
    fn test_skipped_rows_do_not_advance_the_clock() {
        let csv = r#"tourney_date,surface,player_a_name,player_b_name,player_a_win
20190107,HARD,A,B,1
20190301,HARD,A,,1
20190108,HARD,A,B,0"#;

        let results: Vec<_> = stream(csv, InvalidRowPolicy::Skip).collect();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn test_ragged_row_is_a_csv_error() {
        let csv = r#"tourney_date,surface,player_a_name,player_b_name,player_a_win
20190107,HARD,A,B"#;

        let mut s = stream(csv, InvalidRowPolicy::Fail);
        assert!(matches!(s.next().unwrap(), Err(EloError::Csv(_))));
    }

    #[test]
    fn test_read_failure_is_fatal_even_when_skipping() {
        let reader = FailingReader {
            data: Cursor::new(
                "tourney_date,surface,player_a_name,player_b_name,player_a_win\n\
                 20190107,HARD,A,B,1\n",
            ),
        };

        let mut s = MatchStream::new(reader, true, InvalidRowPolicy::Skip).unwrap();
        assert!(s.next().unwrap().is_ok());
        match s.next().unwrap() {
            Err(EloError::Csv(e)) => assert!(matches!(e.kind(), csv::ErrorKind::Io(_))),
            other => panic!("Expected an I/O error, got {:?}", other),
        }
        assert!(s.next().is_none());
        assert_eq!(s.rows_skipped(), 0);
    }

    #[test]
    fn test_row_errors_are_skippable() {
        assert!(is_row_error(&EloError::InvalidRecord {
            row: 2,
            message: "empty player_a_name".to_string(),
        }));
        assert!(!is_row_error(&EloError::MissingColumn {
            column: "surface".to_string(),
        }));
    }
}
