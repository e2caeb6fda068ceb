use thiserror::Error;

use crate::constants::MJD;

#[derive(Error, Debug)]
pub enum SkyError {
    #[error("Invalid observer coordinates: {0}")]
    InvalidObserver(String),

    #[error("Epoch MJD {0} is outside the validity window of the analytic ephemeris")]
    EpochOutOfRange(MJD),

    #[error("Degenerate geometry while computing {0}")]
    DegenerateGeometry(String),

    #[error("ROOTS finding error: {0}")]
    RootFindingError(#[from] roots::SearchError),

    #[error("Time source error: {0}")]
    TimeSourceError(#[from] hifitime::HifitimeError),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML configuration: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Invalid configuration value: {0}")]
    InvalidConfig(String),

    #[error("Unknown celestial body: {0}")]
    UnknownBody(String),

    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    #[error("Unable to install the log subscriber: {0}")]
    LoggingError(String),

    #[error("Sky watcher loop is no longer running")]
    WatcherClosed,
}

impl PartialEq for SkyError {
    fn eq(&self, other: &Self) -> bool {
        use SkyError::*;
        match (self, other) {
            (InvalidObserver(a), InvalidObserver(b)) => a == b,
            (EpochOutOfRange(a), EpochOutOfRange(b)) => a == b,
            (DegenerateGeometry(a), DegenerateGeometry(b)) => a == b,
            (RootFindingError(a), RootFindingError(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,
            (UnknownBody(a), UnknownBody(b)) => a == b,
            (UnknownLocale(a), UnknownLocale(b)) => a == b,
            (LoggingError(a), LoggingError(b)) => a == b,

            // not comparable: equal when same variant
            (TimeSourceError(_), TimeSourceError(_)) => true,
            (IoError(_), IoError(_)) => true,
            (ConfigParseError(_), ConfigParseError(_)) => true,

            (WatcherClosed, WatcherClosed) => true,

            _ => false,
        }
    }
}
