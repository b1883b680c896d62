use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
/// Enum for the errors raised while configuring or feeding a reducer.
pub enum ReducerError {
  #[error("Unknown reduce policy: \"{0}\".")]
  UnknownPolicy(String),

  #[error("Invalid configuration. {0}")]
  InvalidConfiguration(String),

  #[error("Invalid precision. {0}")]
  InvalidPrecision(String),

  #[error("Invalid timestamp. {0}")]
  InvalidTimestamp(String),

  #[error("Sample out of order. Timestamp {timestamp} precedes {last}.")]
  OutOfOrderSample { timestamp: f64, last: f64 },
}

pub type ReducerResult<T> = Result<T, ReducerError>;

impl From<serde_json::Error> for ReducerError {
  fn from(err: serde_json::Error) -> Self {
    ReducerError::InvalidConfiguration(err.to_string())
  }
}
