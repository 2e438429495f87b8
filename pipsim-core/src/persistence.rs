//! Session persistence — flat text files in the settings directory.
//!
//! Loading is best effort: a missing file means no prior state, and a line
//! that does not parse is skipped with a warning while the rest of the file
//! still loads.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::{ClosedTradeRecord, Direction};
use crate::viewport::ZoomLevel;

pub const CONFIG_FILE: &str = "config.txt";
pub const FADE_FILE: &str = "fade.txt";
pub const TREND_FILE: &str = "trend.txt";
pub const HISTORY_FILE: &str = "history.txt";

pub const DEFAULT_EQUITY: f64 = 100.0;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to create settings directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// Everything that survives a restart.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedState {
    pub equity: f64,
    pub rightmost_index: usize,
    pub fade: Vec<f64>,
    pub trend: Vec<f64>,
    pub history: Vec<ClosedTradeRecord>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            equity: DEFAULT_EQUITY,
            rightmost_index: ZoomLevel::default().window_len(),
            fade: Vec::new(),
            trend: Vec::new(),
            history: Vec::new(),
        }
    }
}

/// Load persisted state from `dir`. Never fails; see module docs.
pub fn load(dir: &Path) -> PersistedState {
    let mut state = PersistedState::default();

    if let Some(text) = read_optional(&dir.join(CONFIG_FILE)) {
        apply_config(&mut state, &text, &dir.join(CONFIG_FILE));
    }
    if let Some(text) = read_optional(&dir.join(FADE_FILE)) {
        state.fade = parse_lines(&text, &dir.join(FADE_FILE), parse_pips);
    }
    if let Some(text) = read_optional(&dir.join(TREND_FILE)) {
        state.trend = parse_lines(&text, &dir.join(TREND_FILE), parse_pips);
    }
    if let Some(text) = read_optional(&dir.join(HISTORY_FILE)) {
        state.history = parse_lines(&text, &dir.join(HISTORY_FILE), parse_history_line);
    }

    debug!(
        dir = %dir.display(),
        equity = state.equity,
        rightmost = state.rightmost_index,
        fade = state.fade.len(),
        trend = state.trend.len(),
        history = state.history.len(),
        "persisted state loaded"
    );
    state
}

/// Write all four files, creating `dir` if needed.
pub fn save(dir: &Path, state: &PersistedState) -> Result<(), PersistenceError> {
    std::fs::create_dir_all(dir).map_err(|source| PersistenceError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    write(
        &dir.join(CONFIG_FILE),
        format!("{}\n{}\n", state.equity, state.rightmost_index),
    )?;
    write(&dir.join(FADE_FILE), format_pips(&state.fade))?;
    write(&dir.join(TREND_FILE), format_pips(&state.trend))?;

    let mut history = String::new();
    for record in &state.history {
        history.push_str(&format_history_line(record));
        history.push('\n');
    }
    write(&dir.join(HISTORY_FILE), history)?;
    Ok(())
}

/// `open_index open_price close_index close_price direction_code`
pub fn format_history_line(record: &ClosedTradeRecord) -> String {
    format!(
        "{} {} {} {} {}",
        record.open_index,
        record.open_price,
        record.close_index,
        record.close_price,
        record.direction.code()
    )
}

pub fn parse_history_line(line: &str) -> Result<ClosedTradeRecord, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [open_index, open_price, close_index, close_price, direction] = fields[..] else {
        return Err(format!("expected 5 fields, found {}", fields.len()));
    };
    let code: u8 = direction
        .parse()
        .map_err(|_| format!("bad direction code {direction:?}"))?;
    Ok(ClosedTradeRecord {
        open_index: parse_field(open_index, "open index")?,
        open_price: parse_field(open_price, "open price")?,
        close_index: parse_field(close_index, "close index")?,
        close_price: parse_field(close_price, "close price")?,
        direction: Direction::from_code(code).ok_or_else(|| format!("unknown direction code {code}"))?,
    })
}

/// Pip values are stored to one decimal.
fn format_pips(pips: &[f64]) -> String {
    pips.iter().map(|p| format!("{p:.1}\n")).collect()
}

fn parse_pips(line: &str) -> Result<f64, String> {
    parse_field(line, "pip value")
}

fn parse_field<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("bad {what} {raw:?}"))
}

/// Non-blank lines in order: first is equity, second the viewport index.
fn apply_config(state: &mut PersistedState, text: &str, path: &Path) {
    let mut lines = text.lines().enumerate().filter(|(_, l)| !l.trim().is_empty());

    if let Some((n, line)) = lines.next() {
        match parse_field::<f64>(line, "equity") {
            Ok(equity) if equity.is_finite() => state.equity = equity,
            Ok(_) => skip(path, n, "equity is not finite".into()),
            Err(reason) => skip(path, n, reason),
        }
    }
    if let Some((n, line)) = lines.next() {
        match parse_field::<usize>(line, "viewport index") {
            Ok(index) => state.rightmost_index = index,
            Err(reason) => skip(path, n, reason),
        }
    }
}

fn parse_lines<T>(text: &str, path: &Path, parse: impl Fn(&str) -> Result<T, String>) -> Vec<T> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(n, line)| match parse(line) {
            Ok(value) => Some(value),
            Err(reason) => {
                skip(path, n, reason);
                None
            }
        })
        .collect()
}

fn skip(path: &Path, index: usize, reason: String) {
    let err = PersistenceError::Parse {
        path: path.to_path_buf(),
        line: index + 1,
        reason,
    };
    warn!(error = %err, "skipping persisted line");
}

/// Invalid UTF-8 is replaced rather than rejected, so a bad byte only spoils
/// the line it sits on.
fn read_optional(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(source) => {
            let err = PersistenceError::Read {
                path: path.to_path_buf(),
                source,
            };
            warn!(error = %err, "keeping defaults");
            None
        }
    }
}

fn write(path: &Path, contents: String) -> Result<(), PersistenceError> {
    std::fs::write(path, contents).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PersistedState {
        PersistedState {
            equity: 101.23456789,
            rightmost_index: 1234,
            fade: vec![12.3, -79.0],
            trend: vec![45.6],
            history: vec![
                ClosedTradeRecord {
                    open_index: 1200,
                    open_price: 1.10123,
                    close_index: 1210,
                    close_price: 1.10456,
                    direction: Direction::Long,
                },
                ClosedTradeRecord {
                    open_index: 1220,
                    open_price: 1.3,
                    close_index: 1230,
                    close_price: 1.308,
                    direction: Direction::Short,
                },
            ],
        }
    }

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let state = sample();
        save(dir.path(), &state).unwrap();
        assert_eq!(load(dir.path()), state);
    }

    #[test]
    fn pips_rounded_to_one_decimal() {
        let dir = tempfile::tempdir().unwrap();
        let state = PersistedState {
            trend: vec![50.99999999, -78.96],
            ..PersistedState::default()
        };
        save(dir.path(), &state).unwrap();
        let text = std::fs::read_to_string(dir.path().join(TREND_FILE)).unwrap();
        assert_eq!(text, "51.0\n-79.0\n");
        assert_eq!(load(dir.path()).trend, vec![51.0, -79.0]);
    }

    #[test]
    fn missing_dir_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/pipsim/settings"));
        assert_eq!(loaded, PersistedState::default());
        assert_eq!(loaded.equity, 100.0);
        assert_eq!(loaded.rightmost_index, 450);
    }

    #[test]
    fn save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("settings");
        save(&nested, &PersistedState::default()).unwrap();
        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "abc\n900\n").unwrap();
        std::fs::write(dir.path().join(FADE_FILE), "1.5\n\nnope\n-3.0\n").unwrap();
        std::fs::write(
            dir.path().join(HISTORY_FILE),
            "1 1.1 5 1.2 1\n\
             garbage\n\
             2 1.1 6 1.2 7\n\
             3 1.3 9 1.29 2\n",
        )
        .unwrap();

        let loaded = load(dir.path());
        assert_eq!(loaded.equity, DEFAULT_EQUITY);
        assert_eq!(loaded.rightmost_index, 900);
        assert_eq!(loaded.fade, vec![1.5, -3.0]);
        assert!(loaded.trend.is_empty());
        assert_eq!(loaded.history.len(), 2);
        assert_eq!(loaded.history[1].direction, Direction::Short);
    }

    #[test]
    fn invalid_utf8_only_drops_its_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = b"1 1.1 5 1.2 1\n2 1.1 6 1.2 2\n".to_vec();
        history.extend_from_slice(b"3 1.1 7 1.2 \xff\n");
        std::fs::write(dir.path().join(HISTORY_FILE), history).unwrap();
        std::fs::write(dir.path().join(TREND_FILE), b"4.0\n\xfe\xfe\n-2.0\n").unwrap();

        let loaded = load(dir.path());
        assert_eq!(loaded.history.len(), 2);
        assert_eq!(loaded.history[1].close_index, 6);
        assert_eq!(loaded.trend, vec![4.0, -2.0]);

        // Saving what was loaded keeps the readable records.
        save(dir.path(), &loaded).unwrap();
        assert_eq!(load(dir.path()).history, loaded.history);
    }

    #[test]
    fn config_with_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "\n97.5\n\n600\n").unwrap();
        let loaded = load(dir.path());
        assert_eq!(loaded.equity, 97.5);
        assert_eq!(loaded.rightmost_index, 600);
    }

    #[test]
    fn history_line_format() {
        let record = sample().history[1];
        let line = format_history_line(&record);
        assert_eq!(line, "1220 1.3 1230 1.308 2");
        assert_eq!(parse_history_line(&line).unwrap(), record);
    }

    #[test]
    fn history_line_rejects_wrong_arity() {
        assert!(parse_history_line("1 2 3").is_err());
        assert!(parse_history_line("1 1.1 2 1.2 1 extra").is_err());
    }
}
