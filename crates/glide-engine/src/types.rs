//! Shared geometry and candidate types plus the decoder tuning constants.

use serde::{Deserialize, Serialize};

/// Number of equidistant points every template and every input path is
/// resampled to.
pub const RESAMPLE_N: usize = 64;

/// Sakoe-Chiba band radius for the DTW comparison.
pub const BAND_WIDTH: usize = 10;

/// Normalised radius around the path endpoints used by the pre-filter.
pub const ENDPOINT_RADIUS: f32 = 0.12;

/// Size of the running top-K kept during DTW matching.
pub const GEOMETRIC_TOP_N: usize = 50;

/// Number of candidates returned to the caller.
pub const FINAL_TOP_N: usize = 3;

/// Weight of the geometric score in the combined ranking.
pub const GEOMETRIC_WEIGHT: f32 = 0.6;

/// Weight of the language-model score in the combined ranking.
pub const LANGUAGE_WEIGHT: f32 = 0.4;

/// A point in the normalised keyboard plane [0,1]².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A ranked decode result. Scores all lie in [0,1] and
/// `combined = 0.6 * geometric + 0.4 * language`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub word: String,
    pub word_id: u32,
    pub geometric: f32,
    pub language: f32,
    pub combined: f32,
}

/// Construction-time decoder parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecoderConfig {
    pub resample_n: usize,
    pub band_width: usize,
    pub endpoint_radius: f32,
    pub geometric_top_n: usize,
    pub final_top_n: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            resample_n: RESAMPLE_N,
            band_width: BAND_WIDTH,
            endpoint_radius: ENDPOINT_RADIUS,
            geometric_top_n: GEOMETRIC_TOP_N,
            final_top_n: FINAL_TOP_N,
        }
    }
}

/// Counters describing one decode invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    /// Templates surviving the endpoint pre-filter.
    pub candidates_considered: usize,
    /// DTW comparisons that ran to completion.
    pub dtw_completed: usize,
    /// DTW comparisons abandoned early against the prune threshold.
    pub dtw_pruned: usize,
}
