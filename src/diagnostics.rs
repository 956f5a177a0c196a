//! Non-fatal findings reported while walking a document.

use std::fmt;

use log::warn;

/// Something odd in the input that was skipped rather than aborting extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A reading-order reference that does not resolve to a text region
    NotATextRegion { region_ref: String },
    /// A `RegionRefIndexed` without a `regionRef` attribute
    MissingRegionRef { index: Option<String> },
    /// A `RegionRefIndexed` whose `index` is missing or not an integer; it is ordered last
    InvalidRefIndex {
        region_ref: String,
        index: Option<String>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotATextRegion { region_ref } => write!(f, "Not a TextRegion: {region_ref:?}"),
            Self::MissingRegionRef { index } => match index {
                Some(index) => write!(f, "RegionRefIndexed {index:?} has no regionRef"),
                None => write!(f, "RegionRefIndexed has no regionRef"),
            },
            Self::InvalidRefIndex { region_ref, index } => match index {
                Some(index) => write!(
                    f,
                    "RegionRefIndexed {region_ref:?} has a non-integer index {index:?}"
                ),
                None => write!(f, "RegionRefIndexed {region_ref:?} has no index"),
            },
        }
    }
}

/// Receives diagnostics from an extraction call
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards every diagnostic to `log::warn!`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
    }
}
