//! Error type for target-size searches.

use thiserror::Error;

use super::OptionsError;

/// Ways a search can end without producing an outcome.
///
/// `E` is the error type of the encoder callback. A target the encoder can
/// never reach is *not* an error: the search still returns its best effort,
/// and [`SearchOutcome::within_target`](super::SearchOutcome::within_target)
/// reports the shortfall.
#[derive(Debug, Error)]
pub enum SearchError<E> {
    /// The target byte budget is zero.
    #[error("target size must be a positive number of bytes")]
    InvalidTarget,

    /// The options cannot drive a search.
    #[error("invalid search options: {0}")]
    InvalidOptions(#[from] OptionsError),

    /// The cancellation token was set between probes.
    #[error("search cancelled after {probes} probe(s)")]
    Cancelled { probes: u32 },

    /// The search finished without observing an encoder result. Validated
    /// options always allow at least one probe, so this means the state
    /// machine stopped early.
    #[error("search finished without an encoder result")]
    NoResult,

    /// The encoder callback failed; no further probes were made.
    #[error("encoder failed: {0}")]
    Encoder(E),
}

impl<E> SearchError<E> {
    /// Convert the encoder error, keeping every other variant.
    pub fn map_encoder<F>(self, f: impl FnOnce(E) -> F) -> SearchError<F> {
        match self {
            SearchError::InvalidTarget => SearchError::InvalidTarget,
            SearchError::InvalidOptions(e) => SearchError::InvalidOptions(e),
            SearchError::Cancelled { probes } => SearchError::Cancelled { probes },
            SearchError::NoResult => SearchError::NoResult,
            SearchError::Encoder(e) => SearchError::Encoder(f(e)),
        }
    }

    /// Returns true if the search was stopped through its cancellation token.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SearchError::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err: SearchError<String> = SearchError::InvalidTarget;
        assert_eq!(
            err.to_string(),
            "target size must be a positive number of bytes"
        );

        let err: SearchError<String> = SearchError::Cancelled { probes: 3 };
        assert_eq!(err.to_string(), "search cancelled after 3 probe(s)");

        let err: SearchError<String> = SearchError::Encoder("disk full".to_string());
        assert_eq!(err.to_string(), "encoder failed: disk full");
    }

    #[test]
    fn test_from_options_error() {
        let err: SearchError<String> = OptionsError::ZeroIterations.into();
        assert!(matches!(
            err,
            SearchError::InvalidOptions(OptionsError::ZeroIterations)
        ));
    }

    #[test]
    fn test_map_encoder() {
        let err: SearchError<u32> = SearchError::Encoder(7);
        let mapped = err.map_encoder(|code| format!("code {}", code));
        assert_eq!(mapped.to_string(), "encoder failed: code 7");

        let err: SearchError<u32> = SearchError::Cancelled { probes: 2 };
        let mapped: SearchError<String> = err.map_encoder(|code| code.to_string());
        assert!(mapped.is_cancelled());
    }
}
