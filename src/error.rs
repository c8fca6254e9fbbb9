use thiserror::Error;

/// Errors that may terminate a GPSD session or a scrape.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to reach the GPSD daemon
    #[error("failed to connect to gpsd: {0}")]
    Connection(#[source] std::io::Error),

    /// Failed to send a command to the daemon
    #[error("failed to write command: {0}")]
    Write(#[source] std::io::Error),

    /// Failed to read the next report line (including end of stream)
    #[error("failed to read report: {0}")]
    Read(#[source] std::io::Error),

    /// The line is not even a JSON object carrying a `class`
    #[error("invalid report envelope: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("metrics encoding: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
