//! Ideal swipe templates and the endpoint pre-filter index.

use std::collections::HashMap;

use crate::graph::WordGraph;
use crate::keyboard::{euclidean_dist, KeyLayout};
use crate::types::Point;

const EPS: f32 = 1e-6;

pub fn polyline_length(points: &[Point]) -> f32 {
    points
        .windows(2)
        .map(|pair| euclidean_dist(&pair[0], &pair[1]))
        .sum()
}

/// Resample a polyline to exactly `n` points spaced uniformly along its arc
/// length. The first output equals the input start, the last equals the
/// input end; a degenerate polyline yields `n` copies of the start. Unlike a
/// cursor that only advances per consumed segment, one long segment here can
/// emit several output points, so the spacing contract holds for any segment
/// structure.
pub fn resample(points: &[Point], n: usize) -> Vec<Point> {
    if points.is_empty() || n == 0 {
        return Vec::new();
    }
    if n == 1 || points.len() == 1 {
        return vec![points[0]; n];
    }

    let total = polyline_length(points);
    if total < EPS {
        return vec![points[0]; n];
    }

    let step = total / (n - 1) as f32;
    let mut out = Vec::with_capacity(n);
    out.push(points[0]);

    let mut seg = 1usize;
    let mut consumed = 0.0f32;
    let mut seg_len = euclidean_dist(&points[0], &points[1]);

    for k in 1..n - 1 {
        let target = step * k as f32;
        while consumed + seg_len < target && seg + 1 < points.len() {
            consumed += seg_len;
            seg += 1;
            seg_len = euclidean_dist(&points[seg - 1], &points[seg]);
        }
        let t = if seg_len > EPS {
            ((target - consumed) / seg_len).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let a = points[seg - 1];
        let b = points[seg];
        out.push(Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y)));
    }

    out.push(*points.last().expect("non-empty input"));
    debug_assert_eq!(out.len(), n);
    out
}

/// The ideal path of one dictionary word across the key centres.
#[derive(Debug, Clone)]
pub struct Template {
    pub word_id: u32,
    pub first: char,
    pub last: char,
    /// Exactly `resample_n` points, all in [0,1]².
    pub points: Vec<Point>,
    /// Arc length of the pre-resampled polyline.
    pub arc_len: f32,
}

/// All templates plus the (first, last) endpoint index. Built once, then
/// read-only.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    templates: Vec<Template>,
    endpoint_index: HashMap<(char, char), Vec<u32>>,
    skipped: usize,
}

impl TemplateStore {
    /// Generate a template for every dictionary word of length >= 2 the
    /// layout can place. Words with an unmapped character or fewer than two
    /// distinct key centres are counted in [`TemplateStore::skipped`].
    pub fn generate(graph: &WordGraph, layout: &KeyLayout, resample_n: usize) -> Self {
        let mut templates = Vec::new();
        let mut endpoint_index: HashMap<(char, char), Vec<u32>> = HashMap::new();
        let mut skipped = 0usize;

        for (id, word) in graph.all_words().iter().enumerate() {
            if word.chars().count() < 2 {
                continue;
            }
            match template_for(word, id as u32, layout, resample_n) {
                Some(template) => {
                    let index = templates.len() as u32;
                    endpoint_index
                        .entry((template.first, template.last))
                        .or_default()
                        .push(index);
                    templates.push(template);
                }
                None => {
                    skipped += 1;
                    tracing::debug!(word = %word, "no template for word");
                }
            }
        }

        tracing::debug!(
            templates = templates.len(),
            skipped,
            "generated template store"
        );
        Self {
            templates,
            endpoint_index,
            skipped,
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, index: u32) -> &Template {
        &self.templates[index as usize]
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Words that could not be templated. Partial coverage is acceptable;
    /// callers may inspect this count.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Deduplicated union of index lists over the (start, end) character
    /// cross product, ascending.
    pub fn candidates_for(&self, starts: &[char], ends: &[char]) -> Vec<u32> {
        let mut out = Vec::new();
        for &s in starts {
            for &e in ends {
                if let Some(list) = self.endpoint_index.get(&(s, e)) {
                    out.extend_from_slice(list);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }
}

fn template_for(word: &str, word_id: u32, layout: &KeyLayout, resample_n: usize) -> Option<Template> {
    let path = layout.word_path(word)?;
    if path.len() < 2 {
        return None;
    }
    let arc_len = polyline_length(&path);
    let points = resample(&path, resample_n);
    let first = word.chars().next()?.to_lowercase().next()?;
    let last = word.chars().last()?.to_lowercase().next()?;
    Some(Template {
        word_id,
        first,
        last,
        points,
        arc_len,
    })
}
