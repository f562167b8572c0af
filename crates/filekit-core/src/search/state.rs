//! The search state machine.
//!
//! [`TargetSizeSearch`] owns the bracket, the pass and iteration counters and
//! the retained results for one search. It never calls the encoder itself:
//! a driver asks for the [next probe](TargetSizeSearch::next_probe), encodes
//! it, and [feeds the result back](TargetSizeSearch::observe). This keeps the
//! blocking and async drivers on the same bounded loop.

use std::num::NonZeroU64;

use log::debug;

use super::{OptionsError, QualityBounds, SearchOptions, SearchStrategy};

/// Parameters for one encoder call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    /// Encoder quality in `[0, 1]`.
    pub quality: f32,
    /// Rasterization scale, `1.0` outside scale-augmented searches.
    pub scale: f32,
}

/// What the encoder produced for one probe.
///
/// The search only reads `size_bytes`; the payload is carried through
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeResult<P> {
    pub size_bytes: u64,
    pub payload: P,
}

impl<P> EncodeResult<P> {
    pub fn new(size_bytes: u64, payload: P) -> Self {
        Self {
            size_bytes,
            payload,
        }
    }
}

impl EncodeResult<Vec<u8>> {
    /// Wrap an encoded buffer, taking its length as the size.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            size_bytes: bytes.len() as u64,
            payload: bytes,
        }
    }
}

/// The result a finished search settled on.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<P> {
    pub result: EncodeResult<P>,
    /// The probe that produced `result`.
    pub probe: Probe,
    /// Total encoder calls made by the search.
    pub probes: u32,
    pub target_bytes: u64,
}

impl<P> SearchOutcome<P> {
    /// Returns false when the target was unreachable and `result` is only the
    /// smallest output seen.
    pub fn within_target(&self) -> bool {
        self.result.size_bytes <= self.target_bytes
    }

    /// Bytes by which the result exceeds the target (0 when within it).
    pub fn overshoot_bytes(&self) -> u64 {
        self.result.size_bytes.saturating_sub(self.target_bytes)
    }

    pub fn into_payload(self) -> P {
        self.result.payload
    }
}

#[derive(Debug)]
struct Observation<P> {
    probe: Probe,
    result: EncodeResult<P>,
}

impl<P> Observation<P> {
    fn size(&self) -> u64 {
        self.result.size_bytes
    }
}

/// State of one target-size search.
///
/// Only two payloads are ever retained: the largest result within the target
/// and, while no such result exists, the smallest result over it.
#[derive(Debug)]
pub struct TargetSizeSearch<P> {
    options: SearchOptions,
    target_bytes: u64,
    bracket: QualityBounds,
    scale: f32,
    pass: u32,
    pass_iterations: u32,
    floor_probed: bool,
    probes: u32,
    next: Option<Probe>,
    best_under: Option<Observation<P>>,
    smallest_over: Option<Observation<P>>,
    smallest_seen_bytes: Option<u64>,
}

impl<P> TargetSizeSearch<P> {
    /// Start a search. The first probe is available immediately.
    pub fn new(target_bytes: NonZeroU64, options: SearchOptions) -> Result<Self, OptionsError> {
        options.validate()?;

        let bracket = options.quality_bounds;
        let first = Probe {
            quality: options.initial_quality.unwrap_or_else(|| bracket.midpoint()),
            scale: 1.0,
        };

        Ok(Self {
            options,
            target_bytes: target_bytes.get(),
            bracket,
            scale: 1.0,
            pass: 0,
            pass_iterations: 0,
            floor_probed: false,
            probes: 0,
            next: Some(first),
            best_under: None,
            smallest_over: None,
            smallest_seen_bytes: None,
        })
    }

    /// The probe to encode next, or `None` once the search is finished.
    pub fn next_probe(&self) -> Option<Probe> {
        self.next
    }

    pub fn is_finished(&self) -> bool {
        self.next.is_none()
    }

    /// Encoder calls observed so far.
    pub fn probes(&self) -> u32 {
        self.probes
    }

    /// Zero-based index of the current scale pass.
    pub fn pass(&self) -> u32 {
        self.pass
    }

    /// Current quality bracket.
    pub fn bracket(&self) -> QualityBounds {
        self.bracket
    }

    /// Scale used by the current pass.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn target_bytes(&self) -> u64 {
        self.target_bytes
    }

    /// Smallest output size observed in this search.
    pub fn smallest_seen_bytes(&self) -> Option<u64> {
        self.smallest_seen_bytes
    }

    /// Size of the best result within the target so far.
    pub fn best_under_bytes(&self) -> Option<u64> {
        self.best_under.as_ref().map(Observation::size)
    }

    /// Record the encoder's result for the pending probe and schedule the
    /// next one. Does nothing once the search is finished.
    pub fn observe(&mut self, result: EncodeResult<P>) {
        let Some(probe) = self.next else {
            return;
        };

        self.pass_iterations += 1;
        self.probes += 1;
        if probe.quality <= self.options.quality_bounds.low {
            self.floor_probed = true;
        }

        let size = result.size_bytes;
        debug!(
            "probe {} (pass {}): quality={:.4} scale={:.3} -> {} bytes (target {})",
            self.probes, self.pass, probe.quality, probe.scale, size, self.target_bytes
        );

        if self.smallest_seen_bytes.map_or(true, |smallest| size < smallest) {
            self.smallest_seen_bytes = Some(size);
        }

        let observation = Observation { probe, result };
        if size > self.target_bytes {
            self.bracket.high = probe.quality;
            let is_smallest_over = self
                .smallest_over
                .as_ref()
                .map_or(true, |smallest| size < smallest.size());
            if self.best_under.is_none() && is_smallest_over {
                self.smallest_over = Some(observation);
            }
        } else {
            self.bracket.low = probe.quality;
            // Largest in-budget result wins; ties keep the earlier probe.
            let is_best = self
                .best_under
                .as_ref()
                .map_or(true, |best| size > best.size());
            if is_best {
                self.best_under = Some(observation);
                self.smallest_over = None;
            }
        }

        self.next = self.schedule_next();
    }

    /// Settle on a result: the best in-budget output if any, else the
    /// smallest output seen. `None` only if nothing was observed.
    pub fn finish(self) -> Option<SearchOutcome<P>> {
        let probes = self.probes;
        let target_bytes = self.target_bytes;
        self.best_under
            .or(self.smallest_over)
            .map(|observation| SearchOutcome {
                result: observation.result,
                probe: observation.probe,
                probes,
                target_bytes,
            })
    }

    fn schedule_next(&mut self) -> Option<Probe> {
        let width = self.bracket.high - self.bracket.low;
        let converged = width < self.options.convergence_epsilon;
        if self.pass_iterations < self.options.max_iterations && !converged {
            return Some(Probe {
                quality: self.bracket.midpoint(),
                scale: self.scale,
            });
        }

        if self.best_under.is_some() {
            return None;
        }

        // Every probe in this pass overshot, so the bracket has collapsed
        // towards the lower bound without touching it. Spend one of the
        // remaining iterations on the bound itself.
        if !self.floor_probed && self.pass_iterations < self.options.max_iterations {
            return Some(Probe {
                quality: self.options.quality_bounds.low,
                scale: self.scale,
            });
        }

        let SearchStrategy::ScaleAugmented(schedule) = self.options.strategy else {
            return None;
        };
        if self.pass + 1 >= schedule.max_passes {
            return None;
        }
        let scale = self.scale * schedule.decay_factor;
        if scale < schedule.min_scale {
            return None;
        }

        debug!(
            "pass {} found nothing within {} bytes, retrying at scale {:.3}",
            self.pass, self.target_bytes, scale
        );

        self.pass += 1;
        self.pass_iterations = 0;
        self.floor_probed = false;
        self.scale = scale;
        self.bracket = self.options.quality_bounds;

        Some(Probe {
            quality: self
                .options
                .initial_quality
                .unwrap_or_else(|| self.bracket.midpoint()),
            scale,
        })
    }
}
