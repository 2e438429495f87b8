//! Bar loading — comma-separated lines, fields 1..=4 are O/H/L/C.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{info, warn};

use crate::domain::Bar;

use super::{BarStore, DataLoadError, SourceFiles};

const OPEN_FIELD: usize = 1;
const HIGH_FIELD: usize = 2;
const LOW_FIELD: usize = 3;
const CLOSE_FIELD: usize = 4;

const DATETIME_FORMATS: [&str; 4] = [
    "%d.%m.%Y %H:%M:%S%.3f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y.%m.%d %H:%M",
];

/// Locate the hourly file in `data_dir` and load it into both sides.
pub fn load_store(data_dir: &Path) -> Result<BarStore, DataLoadError> {
    let sources = SourceFiles::locate(data_dir)?;
    let hourly = sources.hourly.ok_or_else(|| DataLoadError::NoSourceFile {
        dir: data_dir.to_path_buf(),
    })?;
    let bars = load_bars(&hourly)?;
    info!(path = %hourly.display(), bars = bars.len(), "loaded hourly series");
    BarStore::from_single_series(bars)
}

pub fn load_bars(path: &Path) -> Result<Vec<Bar>, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_bars(file, path)
}

/// Parse bars from a reader. Rows that do not parse (blank lines, a header)
/// or whose high/low do not bound the open and close are skipped; a read
/// failure or zero parsed rows is an error.
pub fn parse_bars<R: Read>(reader: R, origin: &Path) -> Result<Vec<Bar>, DataLoadError> {
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut bars = Vec::new();
    let mut skipped = 0usize;
    for (line, record) in csv.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => {
                return Err(DataLoadError::Csv {
                    path: origin.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                warn!(line = line + 1, error = %e, "skipping unreadable bar row");
                skipped += 1;
                continue;
            }
        };
        match parse_record(&record) {
            Some(bar) if bar.is_sane() => bars.push(bar),
            Some(bar) => {
                warn!(line = line + 1, high = bar.high, low = bar.low, "skipping inconsistent bar row");
                skipped += 1;
            }
            None => {
                warn!(line = line + 1, "skipping unparseable bar row");
                skipped += 1;
            }
        }
    }

    if bars.is_empty() {
        return Err(DataLoadError::Empty {
            path: origin.to_path_buf(),
        });
    }
    if skipped > 0 {
        warn!(path = %origin.display(), skipped, "some bar rows were skipped");
    }
    Ok(bars)
}

fn parse_record(record: &StringRecord) -> Option<Bar> {
    let price = |field: usize| -> Option<f64> {
        let value: f64 = record.get(field)?.parse().ok()?;
        value.is_finite().then_some(value)
    };
    Some(Bar {
        time: record.get(0).and_then(parse_timestamp),
        open: price(OPEN_FIELD)?,
        high: price(HIGH_FIELD)?,
        low: price(LOW_FIELD)?,
        close: price(CLOSE_FIELD)?,
    })
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn parse(text: &str) -> Result<Vec<Bar>, DataLoadError> {
        parse_bars(text.as_bytes(), Path::new("test.csv"))
    }

    #[test]
    fn parses_ohlc_fields() {
        let bars = parse("01.01.2015 00:00:00.000,1.2100,1.2120,1.2090,1.2110,1500\n").unwrap();
        assert_eq!(bars.len(), 1);
        let bar = bars[0];
        assert_eq!(bar.open, 1.2100);
        assert_eq!(bar.high, 1.2120);
        assert_eq!(bar.low, 1.2090);
        assert_eq!(bar.close, 1.2110);
        assert_eq!(bar.time.unwrap().hour(), 0);
    }

    #[test]
    fn skips_header_and_blank_rows() {
        let text = "Gmt time,Open,High,Low,Close,Volume\n\
                    \n\
                    2015-01-01 01:00:00,1.1,1.2,1.0,1.15,10\n\
                    2015-01-01 02:00:00,1.15,1.25,1.1,1.2,10\n";
        let bars = parse(text).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, 1.2);
    }

    #[test]
    fn short_rows_are_skipped() {
        let bars = parse("x,1.1,1.2\nx,1.1,1.2,1.0,1.15\n").unwrap();
        assert_eq!(bars.len(), 1);
        assert!(bars[0].time.is_none());
    }

    #[test]
    fn nothing_parseable_is_empty() {
        let err = parse("time,open,high,low,close\n").unwrap_err();
        assert!(matches!(err, DataLoadError::Empty { .. }));
    }

    #[test]
    fn non_finite_prices_rejected() {
        let err = parse("t,NaN,1.2,1.0,1.1\n").unwrap_err();
        assert!(matches!(err, DataLoadError::Empty { .. }));
    }

    #[test]
    fn inverted_rows_are_skipped() {
        let bars = parse("t,1.1,1.0000,1.2000,1.15\nt,1.1,1.2,1.0,1.15\nt,1.1,1.12,1.09,1.13\n").unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].high, 1.2);
        assert!(bars.iter().all(Bar::is_sane));

        let err = parse("t,1.1,1.0,1.2,1.15\n").unwrap_err();
        assert!(matches!(err, DataLoadError::Empty { .. }));
    }

    #[test]
    fn load_store_uses_hourly_for_both_sides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("EURUSD_Hourly_Bid.csv"),
            "t,1.1,1.2,1.0,1.15\nt,1.15,1.25,1.1,1.2\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("EURUSD_Daily_Bid.csv"), "t,9,9,9,9\n").unwrap();

        let store = load_store(dir.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.ask_at(1).unwrap().close, 1.2);
        assert_eq!(store.bid_at(1).unwrap().close, 1.2);
    }

    #[test]
    fn load_store_without_hourly_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("EURUSD_Daily.csv"), "t,1,1,1,1\n").unwrap();
        let err = load_store(dir.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::NoSourceFile { .. }));
    }
}
