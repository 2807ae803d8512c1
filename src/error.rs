use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    /// The target block could not be parsed, or has host bits set.
    /// Fatal to the whole run.
    #[error("invalid address range `{input}`: {reason}")]
    InvalidRange { input: String, reason: String },

    /// No CRLF terminator in the captured response. Only ever fatal to
    /// the single address it was read from.
    #[error("malformed banner: no CRLF within {captured} captured bytes")]
    MalformedBanner { captured: usize },
}

pub type Result<T> = std::result::Result<T, ScanError>;
