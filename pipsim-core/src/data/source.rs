//! Source discovery — pick data files out of the data directory by name.

use std::path::{Path, PathBuf};

use super::DataLoadError;

/// Timeframes a data directory may carry, matched by filename substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Hourly,
    FourHours,
    Daily,
    Tick,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::Hourly,
        Timeframe::FourHours,
        Timeframe::Daily,
        Timeframe::Tick,
    ];

    /// Lowercase substring the filename must contain.
    pub fn pattern(self) -> &'static str {
        match self {
            Timeframe::Hourly => "hourly",
            Timeframe::FourHours => "4 hours",
            Timeframe::Daily => "daily",
            Timeframe::Tick => "tick",
        }
    }

    pub fn matches(self, path: &Path) -> bool {
        path.file_name()
            .map(|name| name.to_string_lossy().to_lowercase().contains(self.pattern()))
            .unwrap_or(false)
    }
}

/// Files located for each timeframe. Only `hourly` feeds the working series;
/// the others are located so tooling can report them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFiles {
    pub hourly: Option<PathBuf>,
    pub four_hours: Option<PathBuf>,
    pub daily: Option<PathBuf>,
    pub tick: Option<PathBuf>,
}

impl SourceFiles {
    /// Scan `dir` (non-recursive) for source files.
    pub fn locate(dir: &Path) -> Result<Self, DataLoadError> {
        if !dir.is_dir() {
            return Err(DataLoadError::NoSourceFile {
                dir: dir.to_path_buf(),
            });
        }
        let entries = std::fs::read_dir(dir).map_err(|source| DataLoadError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let paths = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file());
        Ok(Self::from_paths(paths))
    }

    /// First match per timeframe, in lexical path order.
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut paths: Vec<PathBuf> = paths.into_iter().collect();
        paths.sort();
        let pick = |tf: Timeframe| paths.iter().find(|p| tf.matches(p)).cloned();
        Self {
            hourly: pick(Timeframe::Hourly),
            four_hours: pick(Timeframe::FourHours),
            daily: pick(Timeframe::Daily),
            tick: pick(Timeframe::Tick),
        }
    }

    pub fn get(&self, timeframe: Timeframe) -> Option<&Path> {
        match timeframe {
            Timeframe::Hourly => self.hourly.as_deref(),
            Timeframe::FourHours => self.four_hours.as_deref(),
            Timeframe::Daily => self.daily.as_deref(),
            Timeframe::Tick => self.tick.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        let files = SourceFiles::from_paths([
            PathBuf::from("data/EURUSD_HOURLY_Bid.csv"),
            PathBuf::from("data/EURUSD 4 Hours Bid.csv"),
            PathBuf::from("data/eurusd-Daily.csv"),
            PathBuf::from("data/readme.txt"),
        ]);
        assert_eq!(files.hourly, Some(PathBuf::from("data/EURUSD_HOURLY_Bid.csv")));
        assert_eq!(files.four_hours, Some(PathBuf::from("data/EURUSD 4 Hours Bid.csv")));
        assert_eq!(files.daily, Some(PathBuf::from("data/eurusd-Daily.csv")));
        assert_eq!(files.tick, None);
    }

    #[test]
    fn four_hours_is_not_hourly() {
        let files = SourceFiles::from_paths([PathBuf::from("EURUSD 4 Hours.csv")]);
        assert_eq!(files.hourly, None);
        assert!(files.four_hours.is_some());
    }

    #[test]
    fn first_match_in_lexical_order_wins() {
        let files = SourceFiles::from_paths([
            PathBuf::from("b_hourly.csv"),
            PathBuf::from("a_hourly.csv"),
        ]);
        assert_eq!(files.get(Timeframe::Hourly), Some(Path::new("a_hourly.csv")));
    }

    #[test]
    fn missing_directory_is_no_source() {
        let err = SourceFiles::locate(Path::new("/nonexistent/pipsim/data")).unwrap_err();
        assert!(matches!(err, DataLoadError::NoSourceFile { .. }));
    }
}
