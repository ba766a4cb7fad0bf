use std::io::BufRead;

use siege_core::Record;
use siege_parse::{LogLine, ParseError};
use thiserror::Error;

/// Why one input line could not become a replayable record.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("line {line}: could not parse data: {source}")]
    Unparseable { line: u64, source: ParseError },
    #[error("line {line}: no request url recorded")]
    MissingPath { line: u64 },
    #[error("read failed at line {line}: {source}")]
    Read {
        line: u64,
        source: std::io::Error,
    },
}

/// Lazily turns raw log lines into replay records, tagging every failure
/// with its 1-based line number. The replay loop logs and skips failures.
pub fn records<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Record, SourceError>> {
    reader.lines().enumerate().map(|(index, line)| {
        let line_no = index as u64 + 1;
        let raw = line.map_err(|source| SourceError::Read {
            line: line_no,
            source,
        })?;
        let parsed = LogLine::parse(&raw).map_err(|source| SourceError::Unparseable {
            line: line_no,
            source,
        })?;
        let path = parsed.request_url.ok_or(SourceError::MissingPath { line: line_no })?;
        Ok(Record::new(parsed.timestamp, path))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEP: &str = "\x1e";

    fn line(datetime: &str, request_url: &str) -> String {
        let mut fields = vec!["-"; 22];
        fields[0] = datetime;
        fields[1] = "[10.0.0.1:1234]";
        fields[2] = "5";
        fields[3] = "web01";
        fields[4] = "GET";
        fields[5] = "200";
        fields[11] = request_url;
        fields.join(SEP)
    }

    #[test]
    fn yields_records_with_line_tagged_failures() {
        let input = [
            line("[2009-03-01 12:00:00]", "/a"),
            "garbage".to_string(),
            line("[2009-03-01 12:00:02]", "/b"),
            line("[2009-03-01 12:00:03]", "-"),
        ]
        .join("\n");

        let results: Vec<_> = records(input.as_bytes()).collect();

        assert_eq!(results.len(), 4);
        assert_eq!(
            results[0].as_ref().expect("line 1 parses").path,
            "/a".to_string()
        );
        assert!(matches!(
            results[1],
            Err(SourceError::Unparseable { line: 2, .. })
        ));
        assert_eq!(
            results[2].as_ref().expect("line 3 parses").path,
            "/b".to_string()
        );
        assert!(matches!(results[3], Err(SourceError::MissingPath { line: 4 })));
    }

    #[test]
    fn record_timestamps_follow_the_log() {
        let input = [
            line("[2009-03-01 12:00:00]", "/a"),
            line("[2009-03-01 12:00:10]", "/b"),
        ]
        .join("\n");

        let results: Vec<_> = records(input.as_bytes()).flatten().collect();

        assert_eq!(results[1].timestamp - results[0].timestamp, 10.0);
    }
}
