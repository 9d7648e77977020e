use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can end an encode or decode call.
///
/// None of these are recovered from: the call that produced one returns it and
/// leaves the output sink untouched.
#[derive(Error, Debug)]
pub enum Error {
    #[error("input contains no symbols to encode")]
    EmptyInput,

    /// A symbol reached the encoder without a codeword. The code table is
    /// always built from the same input, so this is an internal invariant
    /// violation rather than a user error.
    #[error("symbol {symbol:#04x} has no codeword in the code table")]
    UnknownSymbol { symbol: u8 },

    #[error("bitstream ended with unmatched bits: {bits}")]
    UnmatchedBits { bits: String },

    #[error("malformed artifact at line {line}: {reason}")]
    MalformedArtifact { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Error::MalformedArtifact {
            line,
            reason: reason.into(),
        }
    }
}
