use std::fmt::{Display, Error, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    EmptyData,
    // No version up to 40 can hold the payload at the requested ec level
    DataTooLong,
    InvalidVersion,
    InvalidMaskingPattern,
}

impl Display for QRError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let msg = match *self {
            Self::EmptyData => "Empty data",
            Self::DataTooLong => "Data too long, capacity exceeded",
            Self::InvalidVersion => "Invalid version",
            Self::InvalidMaskingPattern => "Invalid masking pattern",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for QRError {}

pub type QRResult<T> = Result<T, QRError>;
