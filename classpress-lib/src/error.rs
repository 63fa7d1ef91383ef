use std::error::Error;
use std::fmt;

/// Errors surfaced by the pressing pipeline.
///
/// Stylesheet parse failures carry the message of the inner LightningCSS
/// error; the borrowed error itself cannot outlive the stylesheet text, so
/// it is stringified at the boundary.
#[derive(Debug)]
pub enum PressError {
    CssParse(String),
}

impl fmt::Display for PressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PressError::CssParse(msg) => write!(f, "failed to parse stylesheet: {}", msg),
        }
    }
}

impl Error for PressError {}
