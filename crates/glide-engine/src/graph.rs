//! Read-only minimal acyclic word graph.
//!
//! Nodes reference each other by index into a flat node array, never by
//! pointer, so a loaded graph is position-independent. Node 0 is the root.
//! The graph is immutable after construction and freely shareable across
//! threads for reads.

/// Sentinel word id for non-terminal nodes.
pub(crate) const NO_WORD: u32 = u32::MAX;

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// One outgoing transition. Edges on a node are sorted strictly ascending
/// by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub label: char,
    pub target: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub terminal: bool,
    pub(crate) word_id: u32,
    pub edges: Vec<Edge>,
}

impl Node {
    /// The word id stored on this node, present iff the node is terminal.
    pub fn word_id(&self) -> Option<u32> {
        (self.word_id != NO_WORD).then_some(self.word_id)
    }

    /// Binary search over the sorted edge array. The parallel sorted pairs
    /// are tiny at typical alphabets and fit a cache line, which is why
    /// this is an array and not a hash map.
    pub(crate) fn edge_target(&self, label: char) -> Option<u32> {
        self.edges
            .binary_search_by(|e| e.label.cmp(&label))
            .ok()
            .map(|i| self.edges[i].target)
    }
}

/// A minimal deterministic acyclic automaton over a fixed word list, plus
/// the word list itself indexed by word id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordGraph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) words: Vec<String>,
}

impl WordGraph {
    pub(crate) fn new(nodes: Vec<Node>, words: Vec<String>) -> Self {
        Self { nodes, words }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Every dictionary word, indexed by word id.
    pub fn all_words(&self) -> &[String] {
        &self.words
    }

    pub fn word(&self, id: u32) -> Option<&str> {
        self.words.get(id as usize).map(String::as_str)
    }

    /// Walk from the root matching folded characters; `None` if any step
    /// has no matching edge.
    fn walk(&self, s: &str) -> Option<u32> {
        let mut node = 0u32;
        for c in s.chars() {
            node = self.nodes[node as usize].edge_target(fold(c))?;
        }
        Some(node)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.walk(word)
            .is_some_and(|n| self.nodes[n as usize].terminal)
    }

    pub fn word_id(&self, word: &str) -> Option<u32> {
        self.walk(word)
            .and_then(|n| self.nodes[n as usize].word_id())
    }

    /// Up to `limit` words starting with `prefix`, in the stable order
    /// given by sorted edge traversal (a word precedes its extensions).
    pub fn prefix_search(&self, prefix: &str, limit: usize) -> Vec<String> {
        let mut out = Vec::new();
        if limit == 0 {
            return out;
        }
        let Some(start) = self.walk(prefix) else {
            return out;
        };
        let mut buf: String = prefix.chars().map(fold).collect();
        self.collect_words(start, &mut buf, limit, &mut out);
        out
    }

    fn collect_words(&self, node: u32, buf: &mut String, limit: usize, out: &mut Vec<String>) {
        if out.len() >= limit {
            return;
        }
        let node = &self.nodes[node as usize];
        if node.terminal {
            out.push(buf.clone());
        }
        for edge in &node.edges {
            if out.len() >= limit {
                return;
            }
            buf.push(edge.label);
            self.collect_words(edge.target, buf, limit, out);
            buf.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::GraphBuilder;

    fn small_graph() -> crate::graph::WordGraph {
        GraphBuilder::build_from_words(["an", "and", "ant", "any"]).unwrap()
    }

    #[test]
    fn contains_and_prefixes() {
        let g = small_graph();
        assert!(g.contains("an"));
        assert!(g.contains("and"));
        assert!(!g.contains("a"));
        assert!(!g.contains("ann"));
        assert!(!g.contains("anybody"));
    }

    #[test]
    fn lookup_folds_case() {
        let g = small_graph();
        assert!(g.contains("AND"));
        assert_eq!(g.word_id("Ant"), g.word_id("ant"));
    }

    #[test]
    fn word_ids_are_unique_and_dense() {
        let g = small_graph();
        let mut ids: Vec<u32> = g
            .all_words()
            .iter()
            .map(|w| g.word_id(w).unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        for w in g.all_words() {
            assert_eq!(g.word(g.word_id(w).unwrap()), Some(w.as_str()));
        }
    }

    #[test]
    fn prefix_search_order_and_limit() {
        let g = small_graph();
        assert_eq!(g.prefix_search("an", 10), vec!["an", "and", "ant", "any"]);
        assert_eq!(g.prefix_search("an", 2), vec!["an", "and"]);
        assert_eq!(g.prefix_search("b", 10), Vec::<String>::new());
        assert_eq!(g.prefix_search("", 1), vec!["an"]);
    }

    #[test]
    fn terminal_nodes_match_scenario() {
        // an / and / ant / any share the "an" prefix node and keep four
        // distinct terminal nodes.
        let g = small_graph();
        let terminals = g.nodes.iter().filter(|n| n.terminal).count();
        assert_eq!(terminals, 4);
    }
}
