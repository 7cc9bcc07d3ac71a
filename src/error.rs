use thiserror::Error;

/// Structural parse failures. Individual field extractors never fail;
/// a field that cannot be found is simply reported as `None`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The output was empty, or contained nothing but blank lines.
    #[error("ping produced no usable output")]
    EmptyInput,
}

/// Errors from locating and running the ping binary.
#[derive(Debug, Error)]
pub enum PingError {
    #[error("unable to locate the ping binary")]
    CannotLocatePingBinary,

    #[error("execution of ping failed: {0}")]
    ExecutionFailed(#[from] std::io::Error),

    /// ping wrote nothing at all, which in practice means name
    /// resolution failed before a single packet went out.
    #[error("unknown host")]
    HostNotFound,

    #[error(transparent)]
    Parse(#[from] ParseError),
}
