//! Shape-writing input engine.
//!
//! The engine turns a swiped finger path into ranked word candidates in
//! three layers: a minimal acyclic word graph built offline from a lexicon,
//! a store of ideal per-word swipe templates over a key layout, and an
//! online decoder that resamples the captured path, pre-filters templates
//! by endpoint neighbourhood, ranks the survivors with banded DTW and
//! reranks the geometric top-K with an injected language model.
//!
//! Everything the decoder reads is immutable after construction and can be
//! shared across threads; a decode runs to completion on the caller's
//! thread and always returns a (possibly empty) candidate list.

pub mod builder;
pub mod capture;
pub mod dtw;
pub mod graph;
pub mod keyboard;
pub mod lm;
pub mod persistence;
pub mod template;
pub mod types;

pub use builder::{BuildError, GraphBuilder};
pub use capture::{CaptureSession, Gesture, GesturePoint, Rect};
pub use graph::WordGraph;
pub use keyboard::KeyLayout;
pub use lm::{LanguageModel, NeutralModel, UnigramModel};
pub use template::TemplateStore;
pub use types::{Candidate, DecodeStats, DecoderConfig, Point};

use types::{GEOMETRIC_WEIGHT, LANGUAGE_WEIGHT};

const SCORE_EPS: f32 = 1e-9;

/// The online decode pipeline and the read-only resources it consults.
pub struct SwipeDecoder {
    graph: WordGraph,
    layout: KeyLayout,
    templates: TemplateStore,
    lm: Box<dyn LanguageModel>,
    config: DecoderConfig,
}

impl SwipeDecoder {
    /// Build the template store for `graph` over `layout` and wire up the
    /// decoder. Construction is the expensive step; decoding allocates only
    /// per-gesture scratch. `resample_n` is clamped to at least 2 so the
    /// decoder stays total for any caller-supplied config.
    pub fn new(
        graph: WordGraph,
        layout: KeyLayout,
        lm: Box<dyn LanguageModel>,
        mut config: DecoderConfig,
    ) -> Self {
        config.resample_n = config.resample_n.max(2);
        let templates = TemplateStore::generate(&graph, &layout, config.resample_n);
        Self {
            graph,
            layout,
            templates,
            lm,
            config,
        }
    }

    /// Convenience construction from the `word<TAB>count` lexicon format:
    /// the words become the graph, the counts a [`UnigramModel`], the
    /// layout the default QWERTY.
    pub fn from_frequency_text(text: &str, config: DecoderConfig) -> Result<Self, BuildError> {
        let words = text.lines().filter_map(|line| {
            line.split_once('\t')
                .map(|(word, _)| word.trim().to_lowercase())
                .filter(|w| !w.is_empty())
        });
        let graph = GraphBuilder::build_from_words(words)?;
        let lm = Box::new(UnigramModel::from_frequency_text(text));
        Ok(Self::new(graph, KeyLayout::qwerty(), lm, config))
    }

    pub fn graph(&self) -> &WordGraph {
        &self.graph
    }

    pub fn layout(&self) -> &KeyLayout {
        &self.layout
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a captured gesture into at most `final_top_n` candidates,
    /// best first. Total: an unusable gesture yields an empty list, never
    /// an error.
    pub fn decode(&self, gesture: &Gesture, context: &str) -> Vec<Candidate> {
        self.decode_with_stats(gesture, context).0
    }

    /// [`SwipeDecoder::decode`] plus counters describing the invocation.
    pub fn decode_with_stats(
        &self,
        gesture: &Gesture,
        context: &str,
    ) -> (Vec<Candidate>, DecodeStats) {
        let mut stats = DecodeStats::default();
        if gesture.len() < 2 {
            return (Vec::new(), stats);
        }

        let path = template::resample(&gesture.path(), self.config.resample_n);
        let first = path[0];
        let last = *path.last().expect("resampled path non-empty");
        let starts = self.layout.keys_within(first, self.config.endpoint_radius);
        let ends = self.layout.keys_within(last, self.config.endpoint_radius);

        let candidates = self.templates.candidates_for(&starts, &ends);
        stats.candidates_considered = candidates.len();
        if candidates.is_empty() {
            return (Vec::new(), stats);
        }

        // Running top-K by distance. The K-th best feeds back as the prune
        // threshold: infinity until K survivors exist, tightening afterwards.
        let k = self.config.geometric_top_n.max(1);
        let mut top: Vec<(f32, u32)> = Vec::with_capacity(k + 1);
        let mut threshold = f32::INFINITY;

        for index in candidates {
            let template = self.templates.get(index);
            let d = dtw::dtw_distance_fast(
                &path,
                &template.points,
                self.config.band_width,
                threshold,
            );
            if !d.is_finite() {
                stats.dtw_pruned += 1;
                continue;
            }
            stats.dtw_completed += 1;

            let at = top.partition_point(|&(other, _)| other < d);
            top.insert(at, (d, index));
            if top.len() > k {
                top.pop();
            }
            if top.len() == k {
                threshold = top.last().expect("top is non-empty").0;
            }
        }

        if top.is_empty() {
            return (Vec::new(), stats);
        }

        // Normalise against the worst kept distance so the best candidate
        // scores close to 1 and the worst close to 0.
        let d_star = top.last().expect("top is non-empty").0;
        let normalizer = 1.2 * d_star;

        let mut ranked: Vec<Candidate> = top
            .into_iter()
            .map(|(d, index)| {
                let template = self.templates.get(index);
                let word = self
                    .graph
                    .word(template.word_id)
                    .expect("template word id within word array")
                    .to_string();
                let geometric = if normalizer > SCORE_EPS {
                    (1.0 - d / normalizer).max(0.0)
                } else {
                    1.0
                };
                let language = self.lm.score(&word, context).clamp(0.0, 1.0);
                let combined = GEOMETRIC_WEIGHT * geometric + LANGUAGE_WEIGHT * language;
                Candidate {
                    word,
                    word_id: template.word_id,
                    geometric,
                    language,
                    combined,
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.combined
                .partial_cmp(&a.combined)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.word_id.cmp(&b.word_id))
                .then_with(|| a.word.cmp(&b.word))
        });
        ranked.truncate(self.config.final_top_n);

        tracing::debug!(
            considered = stats.candidates_considered,
            completed = stats.dtw_completed,
            pruned = stats.dtw_pruned,
            returned = ranked.len(),
            "decoded gesture"
        );
        (ranked, stats)
    }
}
