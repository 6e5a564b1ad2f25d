#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
  /// Caller supplied an unusable degree, node count, interval or flag combination.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),
  /// A construction that cannot fail for valid input did fail.
  #[error("internal invariant violated: {0}")]
  InternalInvariant(String),
  /// A dense linear-algebra primitive did not produce a usable result.
  #[error("numeric failure: {0}")]
  NumericFailure(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
  pub fn invalid(msg: impl Into<String>) -> Self {
    Self::InvalidArgument(msg.into())
  }
  pub fn invariant(msg: impl Into<String>) -> Self {
    Self::InternalInvariant(msg.into())
  }
  pub fn numeric(msg: impl Into<String>) -> Self {
    Self::NumericFailure(msg.into())
  }
}
