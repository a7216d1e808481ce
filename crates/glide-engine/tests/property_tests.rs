//! Property-based tests for the resampling contract, the builder and the
//! binary format.

use proptest::prelude::*;

use glide_engine::keyboard::euclidean_dist;
use glide_engine::template::{polyline_length, resample};
use glide_engine::{GraphBuilder, Point};

fn point() -> impl Strategy<Value = Point> {
    (0.0f32..=1.0, 0.0f32..=1.0).prop_map(|(x, y)| Point::new(x, y))
}

fn polyline(min: usize, max: usize) -> impl Strategy<Value = Vec<Point>> {
    proptest::collection::vec(point(), min..=max)
}

fn word() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{1,10}").unwrap()
}

fn lexicon() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(word(), 1..40)
}

proptest! {
    #[test]
    fn resample_count_and_endpoints(path in polyline(2, 20), n in 2usize..=96) {
        let r = resample(&path, n);
        prop_assert_eq!(r.len(), n);
        prop_assert!(euclidean_dist(&r[0], &path[0]) < 1e-5);
        prop_assert!(euclidean_dist(&r[n - 1], path.last().unwrap()) < 1e-5);
    }

    #[test]
    fn resample_spacing_never_exceeds_the_step(path in polyline(2, 20), n in 2usize..=96) {
        let r = resample(&path, n);
        let step = polyline_length(&path) / (n - 1) as f32;
        for pair in r.windows(2) {
            // Chords can be shorter than the arc step around corners but
            // never longer.
            prop_assert!(euclidean_dist(&pair[0], &pair[1]) <= step + 1e-4);
        }
    }

    #[test]
    fn resample_stays_inside_the_input_bounding_box(path in polyline(2, 20)) {
        let min_x = path.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_x = path.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        let min_y = path.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = path.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        for p in resample(&path, 64) {
            prop_assert!(p.x >= min_x - 1e-5 && p.x <= max_x + 1e-5);
            prop_assert!(p.y >= min_y - 1e-5 && p.y <= max_y + 1e-5);
        }
    }

    #[test]
    fn resample_is_idempotent_within_corner_drift(path in polyline(2, 8)) {
        let n = 64;
        let once = resample(&path, n);
        let twice = resample(&once, n);
        // Corners shorten the resampled polyline (chord vs arc), shifting
        // later points along the path by a bounded number of steps.
        let eps = (path.len() as f32) * polyline_length(&path) / (n - 1) as f32 + 1e-4;
        for (a, b) in once.iter().zip(&twice) {
            prop_assert!(euclidean_dist(a, b) <= eps);
        }
    }

    #[test]
    fn built_graph_recognises_exactly_its_lexicon(words in lexicon(), probe in word()) {
        let graph = GraphBuilder::build_from_words(words.iter()).unwrap();
        prop_assert_eq!(graph.word_count(), {
            let mut unique = words.clone();
            unique.sort();
            unique.dedup();
            unique.len()
        });

        let mut seen = std::collections::HashSet::new();
        for w in &words {
            prop_assert!(graph.contains(w));
            let id = graph.word_id(w).unwrap();
            prop_assert!((id as usize) < graph.word_count());
            seen.insert(id);
            prop_assert_eq!(graph.word(id).unwrap(), w.as_str());
        }
        prop_assert_eq!(seen.len(), graph.word_count());

        prop_assert_eq!(graph.contains(&probe), words.contains(&probe));
    }

    #[test]
    fn save_load_round_trip(words in lexicon()) {
        let graph = GraphBuilder::build_from_words(words).unwrap();
        let mut bytes = Vec::new();
        glide_engine::persistence::save(&graph, &mut bytes).unwrap();
        let loaded = glide_engine::persistence::load(&mut bytes.as_slice()).unwrap();
        prop_assert_eq!(loaded, graph);
    }
}
