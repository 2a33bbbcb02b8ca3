#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    UnexpectedEof,
    InvalidValue(&'static str),
    LengthOverflow,
    /// Encoding is valid RLP shape-wise but not the canonical form.
    NonCanonical(&'static str),
}

impl std::fmt::Display for WireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireError::UnexpectedEof => write!(f, "unexpected end of input"),
            WireError::InvalidValue(msg) => write!(f, "invalid value: {}", msg),
            WireError::LengthOverflow => write!(f, "length overflow"),
            WireError::NonCanonical(msg) => write!(f, "non-canonical encoding: {}", msg),
        }
    }
}

impl std::error::Error for WireError {}
