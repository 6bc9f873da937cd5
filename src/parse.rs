use tracing::debug;

use crate::errors::HarnessError;
use crate::types::{Dataset, LineOutcome, Record, Rejection};

/// Number of leading fields that make up a record.
pub const RECORD_FIELDS: usize = 4;

/// Decide whether a single line of benchmark output is a data record.
///
/// A line is a candidate when it is non-empty and starts with an ASCII digit.
/// Candidates are split on whitespace runs; the first four fields become
/// `(iteration, latency_ns, minor_faults, major_faults)` and anything after
/// them is ignored.
pub fn admit_line(line: &str) -> LineOutcome {
    let first = match line.as_bytes().first() {
        Some(b) => *b,
        None => return LineOutcome::Rejected(Rejection::Empty),
    };

    if !first.is_ascii_digit() {
        return LineOutcome::Rejected(Rejection::NotDigitPrefixed);
    }

    let fields: Vec<&str> = line.split_whitespace().take(RECORD_FIELDS).collect();
    if fields.len() < RECORD_FIELDS {
        return LineOutcome::Rejected(Rejection::TooFewFields {
            found: fields.len(),
        });
    }

    let mut values = [0u64; RECORD_FIELDS];
    for (i, field) in fields.iter().enumerate() {
        match field.parse::<u64>() {
            Ok(v) => values[i] = v,
            Err(_) => {
                return LineOutcome::Malformed {
                    field: i,
                    value: (*field).to_string(),
                };
            }
        }
    }

    LineOutcome::Accepted(Record::new(values[0], values[1], values[2], values[3]))
}

/// Build a dataset from captured benchmark output.
///
/// Rejected lines are skipped. A malformed candidate aborts the whole parse.
pub fn parse_records(text: &str) -> Result<Dataset, HarnessError> {
    let mut records = Vec::new();
    let mut rejected = 0usize;

    for (idx, line) in text.split('\n').enumerate() {
        match admit_line(line) {
            LineOutcome::Accepted(record) => records.push(record),
            LineOutcome::Rejected(_) => rejected += 1,
            LineOutcome::Malformed { field, value } => {
                return Err(HarnessError::MalformedRecord {
                    line_no: idx + 1,
                    line: line.to_string(),
                    detail: format!("field {} ({:?}) is not an integer", field + 1, value),
                });
            }
        }
    }

    debug!(accepted = records.len(), rejected, "parsed benchmark output");
    Ok(Dataset::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- admit_line tests ----

    #[test]
    fn admit_line_accepts_four_fields() {
        assert_eq!(
            admit_line("0 100 1 0"),
            LineOutcome::Accepted(Record::new(0, 100, 1, 0))
        );
    }

    #[test]
    fn admit_line_ignores_extra_fields() {
        assert_eq!(
            admit_line("2 98 2 0 extra"),
            LineOutcome::Accepted(Record::new(2, 98, 2, 0))
        );
    }

    #[test]
    fn admit_line_accepts_tabs_and_repeated_spaces() {
        assert_eq!(
            admit_line("7\t  350   12\t0"),
            LineOutcome::Accepted(Record::new(7, 350, 12, 0))
        );
    }

    #[test]
    fn admit_line_tolerates_carriage_return() {
        assert_eq!(
            admit_line("3 120 0 0\r"),
            LineOutcome::Accepted(Record::new(3, 120, 0, 0))
        );
    }

    #[test]
    fn admit_line_rejects_empty() {
        assert_eq!(admit_line(""), LineOutcome::Rejected(Rejection::Empty));
    }

    #[test]
    fn admit_line_rejects_text() {
        assert_eq!(
            admit_line("not a record"),
            LineOutcome::Rejected(Rejection::NotDigitPrefixed)
        );
    }

    #[test]
    fn admit_line_rejects_leading_whitespace() {
        assert_eq!(
            admit_line(" 0 100 1 0"),
            LineOutcome::Rejected(Rejection::NotDigitPrefixed)
        );
    }

    #[test]
    fn admit_line_rejects_non_ascii_digit() {
        // Arabic-Indic digit zero
        assert_eq!(
            admit_line("\u{0660} 100 1 0"),
            LineOutcome::Rejected(Rejection::NotDigitPrefixed)
        );
    }

    #[test]
    fn admit_line_rejects_short_lines() {
        assert_eq!(
            admit_line("1 200 3"),
            LineOutcome::Rejected(Rejection::TooFewFields { found: 3 })
        );
        assert_eq!(
            admit_line("42"),
            LineOutcome::Rejected(Rejection::TooFewFields { found: 1 })
        );
    }

    #[test]
    fn admit_line_flags_non_numeric_field() {
        assert_eq!(
            admit_line("1 fast 0 0"),
            LineOutcome::Malformed {
                field: 1,
                value: "fast".to_string()
            }
        );
    }

    #[test]
    fn admit_line_flags_digit_prefixed_word() {
        // "1st" passes the prefix check but is not an integer
        assert_eq!(
            admit_line("1st run 2 3"),
            LineOutcome::Malformed {
                field: 0,
                value: "1st".to_string()
            }
        );
    }

    #[test]
    fn admit_line_flags_negative_count() {
        assert!(matches!(
            admit_line("1 100 -1 0"),
            LineOutcome::Malformed { field: 2, .. }
        ));
    }

    // ---- parse_records tests ----

    #[test]
    fn parse_records_mixed_input() {
        let text = "0 100 1 0\n1 105 0 0\nnot a record\n\n2 98 2 0 extra";
        let dataset = parse_records(text).unwrap();
        assert_eq!(
            dataset.records(),
            &[
                Record::new(0, 100, 1, 0),
                Record::new(1, 105, 0, 0),
                Record::new(2, 98, 2, 0),
            ]
        );
    }

    #[test]
    fn parse_records_keeps_file_order_and_duplicates() {
        let text = "5 10 0 0\n3 20 0 0\n5 30 0 0\n";
        let dataset = parse_records(text).unwrap();
        assert_eq!(dataset.iterations(), vec![5, 3, 5]);
        assert_eq!(dataset.latencies(), vec![10, 20, 30]);
    }

    #[test]
    fn parse_records_with_banner_lines() {
        let text = "=== Task 1: page fault latency ===\n\
                    Iteration Latency(ns) MinorFaults MajorFaults\n\
                    0 1500 1 0\n\
                    1 320 0 0\n\
                    Done.\n";
        let dataset = parse_records(text).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.minor_faults(), vec![1, 0]);
    }

    #[test]
    fn parse_records_empty_input() {
        assert!(parse_records("").unwrap().is_empty());
        assert!(parse_records("no data here\n\n").unwrap().is_empty());
    }

    #[test]
    fn parse_records_malformed_is_fatal() {
        let text = "0 100 1 0\n1 abc 0 0\n2 98 2 0";
        let err = parse_records(text).unwrap_err();
        match err {
            HarnessError::MalformedRecord { line_no, line, .. } => {
                assert_eq!(line_no, 2);
                assert_eq!(line, "1 abc 0 0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
