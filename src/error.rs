use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    InvalidXlsx(String),
    MissingColumn(String),
    Xml(roxmltree::Error),
    Image(String),
    Pdf(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidXlsx(msg) => write!(f, "invalid XLSX: {msg}"),
            Error::MissingColumn(name) => write!(f, "missing required column \"{name}\""),
            Error::Xml(e) => write!(f, "XML error: {e}"),
            Error::Image(msg) => write!(f, "image error: {msg}"),
            Error::Pdf(msg) => write!(f, "PDF error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Xml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Xml(e)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        match e {
            zip::result::ZipError::Io(io) => Error::Io(io),
            other => Error::InvalidXlsx(other.to_string()),
        }
    }
}
