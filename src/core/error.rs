use thiserror::Error;

/// Errors that abort a whole conversion.
///
/// Per-voucher problems never surface here; they degrade to a
/// [`ConversionWarning`] and the affected field is left unset.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConvertError {
    /// The input bytes could not be decoded to text.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The input is not well-formed XML.
    #[error("XML parse error at byte {position}: {message}")]
    Parse {
        /// Byte offset in the decoded document where parsing stopped.
        position: u64,
        /// Human-readable description from the reader.
        message: String,
    },

    /// The tabular sink failed to serialize the rows.
    #[error("sink error: {0}")]
    Sink(String),

    /// Underlying I/O failure while reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub(crate) fn parse(position: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Whether the error was caused by the client's document rather than
    /// by the converter itself.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Encoding(_) | Self::Parse { .. })
    }
}

/// A recoverable problem found while processing one voucher group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionWarning {
    /// A field did not match its expected format and was left unset.
    FieldFormat {
        /// Voucher number of the affected group, if known.
        voucher: Option<String>,
        /// Upper-cased tag name of the field.
        field: String,
        /// The offending raw text.
        value: String,
    },
    /// A bill allocation's type matched none of the known roles.
    UnclassifiedBillType {
        /// Voucher number of the affected group, if known.
        voucher: Option<String>,
        /// The bill type text, or `None` when the allocation had no type.
        bill_type: Option<String>,
    },
    /// Summing the voucher's amounts left the `Decimal` range, so the
    /// voucher cannot be verified.
    AmountOverflow {
        /// Voucher number of the affected group, if known.
        voucher: Option<String>,
    },
}

impl std::fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let voucher = |v: &Option<String>| v.clone().unwrap_or_else(|| "?".into());
        match self {
            Self::FieldFormat {
                voucher: v,
                field,
                value,
            } => write!(
                f,
                "voucher {}: field {field} has malformed value '{value}'",
                voucher(v)
            ),
            Self::UnclassifiedBillType {
                voucher: v,
                bill_type: Some(bt),
            } => write!(f, "voucher {}: unrecognized bill type '{bt}'", voucher(v)),
            Self::UnclassifiedBillType {
                voucher: v,
                bill_type: None,
            } => write!(f, "voucher {}: bill allocation without bill type", voucher(v)),
            Self::AmountOverflow { voucher: v } => {
                write!(f, "voucher {}: amounts overflow the decimal range", voucher(v))
            }
        }
    }
}
