use std::string::FromUtf8Error;

use thiserror::Error;

/// Failures when reading player lists or writing schedules
#[derive(Debug, Error)]
pub enum ScheduleIoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),

    #[error("no player names found")]
    EmptyPlayerList,
}
