//! Incremental minimal word-graph construction.
//!
//! Words arrive in lexicographic order. The builder keeps the rightmost
//! path of the growing automaton on an "unchecked" stack; whenever the next
//! word diverges, the part of that path below the common prefix is frozen
//! bottom-up against a registry of canonical subtrees. A child whose
//! signature (terminal flag, word id, ordered edges to canonical targets)
//! already has a canonical representative is replaced by it, so structural
//! equality coincides with right-language equality by the time a node is
//! considered.
//!
//! Build nodes live in an arena and reference each other by index, which
//! sidesteps the ownership cycle between the registry and the tree.

use std::collections::{HashMap, VecDeque};

use crate::graph::{Edge, Node, WordGraph, NO_WORD};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("lexicon out of order: {word:?} follows {prev:?}")]
    UnsortedInput { prev: String, word: String },
}

#[derive(Clone)]
struct BuildNode {
    terminal: bool,
    word_id: u32,
    /// (label, arena index), sorted ascending by label; sorted input means
    /// new edges always append with a strictly larger label.
    edges: Vec<(char, usize)>,
}

impl BuildNode {
    fn new() -> Self {
        Self {
            terminal: false,
            word_id: NO_WORD,
            edges: Vec::new(),
        }
    }
}

/// Registry key: right-language identity of a frozen subtree. The word id
/// participates so every word keeps a unique id through merging (see
/// DESIGN.md).
#[derive(PartialEq, Eq, Hash)]
struct Signature {
    terminal: bool,
    word_id: u32,
    edges: Vec<(char, usize)>,
}

struct UncheckedEntry {
    parent: usize,
    label: char,
    child: usize,
}

pub struct GraphBuilder {
    arena: Vec<BuildNode>,
    registry: HashMap<Signature, usize>,
    unchecked: Vec<UncheckedEntry>,
    prev_word: Option<String>,
    words: Vec<String>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            arena: vec![BuildNode::new()],
            registry: HashMap::new(),
            unchecked: Vec::new(),
            prev_word: None,
            words: Vec::new(),
        }
    }

    /// Insert the next word. Input must be lexicographically non-decreasing
    /// after case folding; an equal word is a no-op, a smaller one is
    /// rejected.
    pub fn insert(&mut self, word: &str) -> Result<(), BuildError> {
        let word = word.to_lowercase();
        let common = match &self.prev_word {
            Some(prev) => match word.as_str().cmp(prev.as_str()) {
                std::cmp::Ordering::Less => {
                    return Err(BuildError::UnsortedInput {
                        prev: prev.clone(),
                        word,
                    });
                }
                std::cmp::Ordering::Equal => return Ok(()),
                std::cmp::Ordering::Greater => common_prefix_chars(prev, &word),
            },
            None => 0,
        };

        self.freeze_to(common);

        let mut node = match self.unchecked.last() {
            Some(entry) => entry.child,
            None => 0,
        };
        for c in word.chars().skip(common) {
            let child = self.arena.len();
            self.arena.push(BuildNode::new());
            debug_assert!(self.arena[node].edges.last().map_or(true, |&(l, _)| l < c));
            self.arena[node].edges.push((c, child));
            self.unchecked.push(UncheckedEntry {
                parent: node,
                label: c,
                child,
            });
            node = child;
        }

        self.arena[node].terminal = true;
        self.arena[node].word_id = self.words.len() as u32;
        self.words.push(word.clone());
        self.prev_word = Some(word);
        Ok(())
    }

    /// Freeze the unchecked stack down to `depth`, replacing each popped
    /// child by its canonical representative when one exists.
    fn freeze_to(&mut self, depth: usize) {
        while self.unchecked.len() > depth {
            let entry = self.unchecked.pop().expect("stack checked non-empty");
            let child = &self.arena[entry.child];
            let sig = Signature {
                terminal: child.terminal,
                word_id: child.word_id,
                edges: child.edges.clone(),
            };
            if let Some(canonical) = self.registry.get(&sig).copied() {
                let parent = &mut self.arena[entry.parent];
                let slot = parent
                    .edges
                    .iter_mut()
                    .find(|(label, _)| *label == entry.label)
                    .expect("frozen edge exists on parent");
                slot.1 = canonical;
            } else {
                self.registry.insert(sig, entry.child);
            }
        }
    }

    /// Freeze everything and flatten the canonical nodes into a dense
    /// BFS-ordered array with the root at index 0.
    pub fn finish(mut self) -> WordGraph {
        self.freeze_to(0);

        let mut dense: Vec<u32> = vec![NO_WORD; self.arena.len()];
        let mut order: Vec<usize> = Vec::new();
        let mut queue: VecDeque<usize> = VecDeque::new();
        dense[0] = 0;
        order.push(0);
        queue.push_back(0);
        while let Some(idx) = queue.pop_front() {
            for &(_, target) in &self.arena[idx].edges {
                if dense[target] == NO_WORD {
                    dense[target] = order.len() as u32;
                    order.push(target);
                    queue.push_back(target);
                }
            }
        }

        let nodes = order
            .iter()
            .map(|&idx| {
                let n = &self.arena[idx];
                Node {
                    terminal: n.terminal,
                    word_id: n.word_id,
                    edges: n
                        .edges
                        .iter()
                        .map(|&(label, target)| Edge {
                            label,
                            target: dense[target],
                        })
                        .collect(),
                }
            })
            .collect();

        tracing::debug!(
            words = self.words.len(),
            arena = self.arena.len(),
            nodes = order.len(),
            "flattened word graph"
        );
        WordGraph::new(nodes, self.words)
    }

    /// Build from any word iterator: sorts and dedups first, so unsorted
    /// input cannot reach `insert`.
    pub fn build_from_words<I, S>(words: I) -> Result<WordGraph, BuildError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sorted: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        sorted.sort_unstable();
        sorted.dedup();

        let mut builder = Self::new();
        for word in &sorted {
            builder.insert(word)?;
        }
        Ok(builder.finish())
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn common_prefix_chars(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsorted_input() {
        let mut b = GraphBuilder::new();
        b.insert("cat").unwrap();
        let err = b.insert("bat").unwrap_err();
        assert!(matches!(err, BuildError::UnsortedInput { .. }));
    }

    #[test]
    fn duplicate_insert_is_noop() {
        let mut b = GraphBuilder::new();
        b.insert("cat").unwrap();
        b.insert("cat").unwrap();
        let g = b.finish();
        assert_eq!(g.word_count(), 1);
        assert_eq!(g.word_id("cat"), Some(0));
    }

    #[test]
    fn every_input_word_is_recognised() {
        let words = ["an", "and", "ant", "any", "band", "bandit", "bat"];
        let g = GraphBuilder::build_from_words(words).unwrap();
        for (i, w) in words.iter().enumerate() {
            assert!(g.contains(w), "{w} missing");
            assert_eq!(g.word_id(w), Some(i as u32));
        }
        assert!(!g.contains("ba"));
        assert!(!g.contains("bandits"));
    }

    #[test]
    fn no_equivalent_nodes_coexist() {
        let g = GraphBuilder::build_from_words([
            "tale", "talent", "tales", "tiding", "tidings", "walk", "walked", "walking",
        ])
        .unwrap();
        let mut seen = std::collections::HashSet::new();
        for node in &g.nodes {
            let key = (node.terminal, node.word_id().unwrap_or(u32::MAX), node.edges.clone());
            assert!(seen.insert(key), "duplicate node signature in built graph");
        }
    }

    #[test]
    fn edges_sorted_and_targets_in_range() {
        let g = GraphBuilder::build_from_words(["ab", "ad", "ba", "bd", "ca"]).unwrap();
        let n = g.node_count() as u32;
        for node in &g.nodes {
            for pair in node.edges.windows(2) {
                assert!(pair[0].label < pair[1].label);
            }
            for e in &node.edges {
                assert!(e.target < n);
            }
        }
    }

    #[test]
    fn shared_prefixes_share_nodes() {
        // root -a-> n -b-> n2, then edges c and d to two terminal leaves.
        let g = GraphBuilder::build_from_words(["abc", "abc", "abd"]).unwrap();
        assert_eq!(g.word_count(), 2);
        assert_eq!(g.node_count(), 5);
    }

    #[test]
    fn empty_builder_yields_root_only() {
        let g = GraphBuilder::new().finish();
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.word_count(), 0);
        assert!(!g.contains(""));
    }
}
