//! Binary serialization of the word graph.
//!
//! Little-endian layout:
//!
//! ```text
//! u32 node count
//! u32 word count
//! per node, in BFS order:
//!   u8  terminal flag (0/1)
//!   i32 word id (-1 when absent)
//!   u16 edge count
//!   per edge: u16 codepoint (BMP), i32 target node index
//! per word, in word-id order:
//!   u16 byte length, UTF-8 bytes
//! ```
//!
//! The loader validates counts, index ranges, the terminal/word-id pairing
//! and UTF-8 before handing out a graph.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::graph::{Edge, Node, WordGraph, NO_WORD};

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("edge target {target} out of range (node count {node_count})")]
    BadTarget { target: i32, node_count: u32 },
    #[error("word id {word_id} out of range (word count {word_count})")]
    BadWordId { word_id: i32, word_count: u32 },
    #[error("non-terminal node {node} carries word id {word_id}")]
    NonTerminalWordId { node: u32, word_id: i32 },
    #[error("terminal node {node} has no word id")]
    MissingWordId { node: u32 },
    #[error("invalid terminal flag {value} on node {node}")]
    BadTerminalFlag { node: u32, value: u8 },
    #[error("codepoint {value:#06x} is not a valid label")]
    BadCodepoint { value: u16 },
    #[error("edge labels of node {node} not strictly ascending")]
    UnsortedEdges { node: u32 },
    #[error("word {index} is not valid UTF-8")]
    InvalidUtf8 { index: u32 },
    #[error("label {label:?} is outside the basic multilingual plane")]
    UnencodableLabel { label: char },
    #[error("node {node} has {count} edges, more than the format can hold")]
    TooManyEdges { node: u32, count: usize },
    #[error("word {index} is {length} bytes, longer than the format can hold")]
    WordTooLong { index: u32, length: usize },
    #[error("trailing bytes after word table")]
    TrailingData,
}

pub fn save(graph: &WordGraph, w: &mut impl Write) -> Result<(), FormatError> {
    w.write_all(&(graph.nodes.len() as u32).to_le_bytes())?;
    w.write_all(&(graph.words.len() as u32).to_le_bytes())?;

    for (index, node) in graph.nodes.iter().enumerate() {
        w.write_all(&[u8::from(node.terminal)])?;
        let id = match node.word_id() {
            Some(id) => id as i32,
            None => -1,
        };
        w.write_all(&id.to_le_bytes())?;
        if node.edges.len() > u16::MAX as usize {
            return Err(FormatError::TooManyEdges {
                node: index as u32,
                count: node.edges.len(),
            });
        }
        w.write_all(&(node.edges.len() as u16).to_le_bytes())?;
        for edge in &node.edges {
            let cp = edge.label as u32;
            if cp > u16::MAX as u32 {
                return Err(FormatError::UnencodableLabel { label: edge.label });
            }
            w.write_all(&(cp as u16).to_le_bytes())?;
            w.write_all(&(edge.target as i32).to_le_bytes())?;
        }
    }

    for (index, word) in graph.words.iter().enumerate() {
        if word.len() > u16::MAX as usize {
            return Err(FormatError::WordTooLong {
                index: index as u32,
                length: word.len(),
            });
        }
        w.write_all(&(word.len() as u16).to_le_bytes())?;
        w.write_all(word.as_bytes())?;
    }
    Ok(())
}

/// Atomic save: the file is written next to `path` and renamed into place,
/// so a crash mid-write never leaves a torn graph behind.
pub fn save_to_path(graph: &WordGraph, path: &Path) -> Result<(), FormatError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let temp = NamedTempFile::new_in(parent)?;
    let mut writer = BufWriter::new(&temp);
    save(graph, &mut writer)?;
    writer.flush()?;
    drop(writer);
    temp.persist(path).map_err(|e| FormatError::Io(e.error))?;
    Ok(())
}

pub fn load(r: &mut impl Read) -> Result<WordGraph, FormatError> {
    let node_count = read_u32(r)?;
    let word_count = read_u32(r)?;

    let mut nodes = Vec::with_capacity(node_count as usize);
    for index in 0..node_count {
        let terminal = match read_u8(r)? {
            0 => false,
            1 => true,
            value => return Err(FormatError::BadTerminalFlag { node: index, value }),
        };
        let word_id = read_i32(r)?;
        match (terminal, word_id) {
            (true, id) if id < 0 => return Err(FormatError::MissingWordId { node: index }),
            (true, id) if id as u32 >= word_count => {
                return Err(FormatError::BadWordId {
                    word_id: id,
                    word_count,
                })
            }
            (false, -1) => {}
            (false, id) => return Err(FormatError::NonTerminalWordId { node: index, word_id: id }),
            _ => {}
        }

        let edge_count = read_u16(r)?;
        let mut edges = Vec::with_capacity(edge_count as usize);
        for _ in 0..edge_count {
            let cp = read_u16(r)?;
            let label =
                char::from_u32(cp as u32).ok_or(FormatError::BadCodepoint { value: cp })?;
            let target = read_i32(r)?;
            if target < 0 || target as u32 >= node_count {
                return Err(FormatError::BadTarget { target, node_count });
            }
            if edges.last().map_or(false, |prev: &Edge| prev.label >= label) {
                return Err(FormatError::UnsortedEdges { node: index });
            }
            edges.push(Edge {
                label,
                target: target as u32,
            });
        }

        nodes.push(Node {
            terminal,
            word_id: if terminal { word_id as u32 } else { NO_WORD },
            edges,
        });
    }

    let mut words = Vec::with_capacity(word_count as usize);
    for index in 0..word_count {
        let len = read_u16(r)?;
        let mut bytes = vec![0u8; len as usize];
        r.read_exact(&mut bytes)?;
        let word = String::from_utf8(bytes).map_err(|_| FormatError::InvalidUtf8 { index })?;
        words.push(word);
    }

    let mut trailing = [0u8; 1];
    if r.read(&mut trailing)? != 0 {
        return Err(FormatError::TrailingData);
    }

    tracing::debug!(nodes = node_count, words = word_count, "loaded word graph");
    Ok(WordGraph::new(nodes, words))
}

pub fn load_from_path(path: &Path) -> Result<WordGraph, FormatError> {
    let mut reader = BufReader::new(File::open(path)?);
    load(&mut reader)
}

fn read_u8(r: &mut impl Read) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u16(r: &mut impl Read) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32(r: &mut impl Read) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_i32(r: &mut impl Read) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}
