//! Key layout geometry: character to key-centre mapping in the unit square.

use std::collections::HashMap;

use crate::types::Point;

/// Width of one key in normalised coordinates.
const KEY_WIDTH: f32 = 0.1;

pub fn euclidean_dist(a: &Point, b: &Point) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// A partial mapping from character to a key centre in [0,1]².
///
/// Lookups fold case first. The engine treats the layout as opaque: any
/// single-alphabet mapping supplied through [`KeyLayout::from_centers`]
/// works the same as the built-in QWERTY.
#[derive(Debug, Clone)]
pub struct KeyLayout {
    centers: HashMap<char, Point>,
}

impl KeyLayout {
    /// The default QWERTY layout: three rows at y = 0.17 / 0.50 / 0.83,
    /// row offsets 0, 0.5 and 1.5 key-widths, each key 0.1 wide.
    pub fn qwerty() -> Self {
        const ROWS: [(&str, f32, f32); 3] = [
            ("qwertyuiop", 0.0, 0.17),
            ("asdfghjkl", 0.5, 0.50),
            ("zxcvbnm", 1.5, 0.83),
        ];

        let mut centers = HashMap::new();
        for (keys, offset, y) in ROWS {
            for (i, c) in keys.chars().enumerate() {
                let x = (offset + i as f32 + 0.5) * KEY_WIDTH;
                centers.insert(c, Point::new(x, y));
            }
        }
        Self { centers }
    }

    /// A caller-supplied layout. Keys are folded to lowercase.
    pub fn from_centers(centers: impl IntoIterator<Item = (char, Point)>) -> Self {
        Self {
            centers: centers.into_iter().map(|(c, p)| (fold(c), p)).collect(),
        }
    }

    pub fn center(&self, c: char) -> Option<Point> {
        self.centers.get(&fold(c)).copied()
    }

    /// Characters whose key centre lies within `radius` of `point`,
    /// sorted by label for deterministic downstream iteration.
    pub fn keys_within(&self, point: Point, radius: f32) -> Vec<char> {
        let mut keys: Vec<char> = self
            .centers
            .iter()
            .filter(|(_, center)| euclidean_dist(center, &point) <= radius)
            .map(|(&c, _)| c)
            .collect();
        keys.sort_unstable();
        keys
    }

    /// The polyline of key centres for `word`, with consecutive duplicate
    /// centres collapsed (double letters contribute one centre). `None` if
    /// any character has no key.
    pub fn word_path(&self, word: &str) -> Option<Vec<Point>> {
        let mut path: Vec<Point> = Vec::with_capacity(word.len());
        for c in word.chars() {
            let center = self.center(c)?;
            if path.last() != Some(&center) {
                path.push(center);
            }
        }
        Some(path)
    }
}
