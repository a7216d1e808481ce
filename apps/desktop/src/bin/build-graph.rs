//! Compile a lexicon text file into the word-graph binary format.
//!
//! Usage: build-graph <lexicon.txt> <output.bin>
//!
//! The lexicon is one word per line, optionally `word<TAB>count` (counts
//! are ignored here; the demo reads them separately for the unigram model).

use anyhow::{bail, Context};
use glide_engine::{persistence, GraphBuilder, KeyLayout, TemplateStore, types::RESAMPLE_N};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        bail!("usage: {} <lexicon.txt> <output.bin>", args[0]);
    }

    let text = std::fs::read_to_string(&args[1])
        .with_context(|| format!("reading lexicon {}", args[1]))?;
    let words = text.lines().filter_map(|line| {
        let word = match line.split_once('\t') {
            Some((w, _)) => w,
            None => line,
        };
        let word = word.trim();
        (!word.is_empty()).then(|| word.to_string())
    });

    let graph = GraphBuilder::build_from_words(words).context("building word graph")?;
    persistence::save_to_path(&graph, std::path::Path::new(&args[2]))
        .with_context(|| format!("writing {}", args[2]))?;

    let templates = TemplateStore::generate(&graph, &KeyLayout::qwerty(), RESAMPLE_N);
    println!(
        "{}: {} words, {} nodes, {} templates ({} words skipped)",
        args[2],
        graph.word_count(),
        graph.node_count(),
        templates.len(),
        templates.skipped()
    );
    Ok(())
}
