//! Target-size search.
//!
//! Finds the encoder quality (and, for rasterized documents, the scale) whose
//! output comes closest to a byte budget without exceeding it, using a
//! bounded binary search over the quality bracket.
//!
//! # Strategies
//!
//! - [`SearchStrategy::SingleParameter`]: one binary search over quality.
//! - [`SearchStrategy::ScaleAugmented`]: repeated binary searches, shrinking
//!   the scale after each pass that fails to fit.
//!
//! Both run through the same [`TargetSizeSearch`] state machine. The
//! [`search`] driver calls a blocking encoder; [`search_async`] awaits an
//! encoder that returns a future. Probes are always strictly sequential,
//! since each probe's bracket depends on the previous result.
//!
//! # Examples
//!
//! ```ignore
//! use filekit_core::search::{search, EncodeResult, SearchOptions};
//!
//! let outcome = search(
//!     |probe| Ok::<_, String>(EncodeResult::from_bytes(encode_at(probe.quality))),
//!     200 * 1024,
//!     SearchOptions::image(),
//!     None,
//! )?;
//! if !outcome.within_target() {
//!     println!("closest achievable: {} bytes", outcome.result.size_bytes);
//! }
//! ```

mod cancel;
mod error;
mod options;
mod state;

use std::future::Future;
use std::num::NonZeroU64;

pub use cancel::CancellationToken;
pub use error::SearchError;
pub use options::{
    OptionsError, QualityBounds, ScaleSchedule, SearchOptions, SearchOverrides, SearchStrategy,
};
pub use state::{EncodeResult, Probe, SearchOutcome, TargetSizeSearch};

/// Run a target-size search with a blocking encoder.
///
/// `encode` is called at most [`SearchOptions::max_probes`] times. The first
/// encoder error aborts the search and is returned as
/// [`SearchError::Encoder`]. If `cancel` is set before a probe, the search
/// stops with [`SearchError::Cancelled`].
pub fn search<P, E, F>(
    mut encode: F,
    target_bytes: u64,
    options: SearchOptions,
    cancel: Option<&CancellationToken>,
) -> Result<SearchOutcome<P>, SearchError<E>>
where
    F: FnMut(Probe) -> Result<EncodeResult<P>, E>,
{
    let mut state = start(target_bytes, options)?;

    while let Some(probe) = state.next_probe() {
        check_cancelled(cancel, &state)?;
        let result = encode(probe).map_err(SearchError::Encoder)?;
        state.observe(result);
    }

    finish(state)
}

/// Run a target-size search with an encoder that returns a future.
///
/// Each probe's future is awaited before the next probe is chosen.
/// Semantics are otherwise identical to [`search`].
pub async fn search_async<P, E, F, Fut>(
    mut encode: F,
    target_bytes: u64,
    options: SearchOptions,
    cancel: Option<&CancellationToken>,
) -> Result<SearchOutcome<P>, SearchError<E>>
where
    F: FnMut(Probe) -> Fut,
    Fut: Future<Output = Result<EncodeResult<P>, E>>,
{
    let mut state = start(target_bytes, options)?;

    while let Some(probe) = state.next_probe() {
        check_cancelled(cancel, &state)?;
        let result = encode(probe).await.map_err(SearchError::Encoder)?;
        state.observe(result);
    }

    finish(state)
}

fn start<P, E>(
    target_bytes: u64,
    options: SearchOptions,
) -> Result<TargetSizeSearch<P>, SearchError<E>> {
    let target = NonZeroU64::new(target_bytes).ok_or(SearchError::InvalidTarget)?;
    Ok(TargetSizeSearch::new(target, options)?)
}

fn check_cancelled<P, E>(
    cancel: Option<&CancellationToken>,
    state: &TargetSizeSearch<P>,
) -> Result<(), SearchError<E>> {
    match cancel {
        Some(token) if token.is_cancelled() => {
            log::info!("search cancelled after {} probe(s)", state.probes());
            Err(SearchError::Cancelled {
                probes: state.probes(),
            })
        }
        _ => Ok(()),
    }
}

fn finish<P, E>(state: TargetSizeSearch<P>) -> Result<SearchOutcome<P>, SearchError<E>> {
    let outcome = state.finish().ok_or(SearchError::NoResult)?;

    log::debug!(
        "search settled on {} bytes (target {}) after {} probe(s), quality={:.4} scale={:.3}",
        outcome.result.size_bytes,
        outcome.target_bytes,
        outcome.probes,
        outcome.probe.quality,
        outcome.probe.scale
    );

    Ok(outcome)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
