//! Replay every template's ideal path through the full decoder and report
//! how often each word recovers itself.

use glide_engine::capture::SAMPLE_INTERVAL;
use glide_engine::{DecoderConfig, Gesture, SwipeDecoder};

const DICT_TEXT: &str = include_str!("../../../../word_freq.txt");

fn main() -> anyhow::Result<()> {
    let decoder = SwipeDecoder::from_frequency_text(DICT_TEXT, DecoderConfig::default())?;

    println!(
        "Lexicon: {} words, {} graph nodes, {} templates ({} skipped)\n",
        decoder.graph().word_count(),
        decoder.graph().node_count(),
        decoder.templates().len(),
        decoder.templates().skipped()
    );

    let mut total = 0usize;
    let mut top1 = 0usize;
    let mut top3 = 0usize;
    let mut completed = 0usize;
    let mut pruned = 0usize;
    let mut misses: Vec<(String, Option<String>)> = Vec::new();

    for template in decoder.templates().templates() {
        let word = decoder
            .graph()
            .word(template.word_id)
            .expect("template word id in range")
            .to_string();
        let path = decoder
            .layout()
            .word_path(&word)
            .expect("templated word maps to the layout");
        let gesture = Gesture::from_path(&path, SAMPLE_INTERVAL);

        let (candidates, stats) = decoder.decode_with_stats(&gesture, "");
        completed += stats.dtw_completed;
        pruned += stats.dtw_pruned;

        total += 1;
        let rank = candidates.iter().position(|c| c.word == word);
        match rank {
            Some(0) => {
                top1 += 1;
                top3 += 1;
            }
            Some(_) => top3 += 1,
            None => misses.push((word, candidates.first().map(|c| c.word.clone()))),
        }
    }

    println!("Replayed {total} ideal paths");
    println!(
        "  top-1: {top1} ({:.1}%)",
        100.0 * top1 as f64 / total.max(1) as f64
    );
    println!(
        "  top-3: {top3} ({:.1}%)",
        100.0 * top3 as f64 / total.max(1) as f64
    );
    println!("  dtw comparisons: {completed} completed, {pruned} pruned");

    if !misses.is_empty() {
        println!("\nMissed words:");
        for (word, got) in misses.iter().take(20) {
            println!("  {word} -> {}", got.as_deref().unwrap_or("(nothing)"));
        }
    }
    Ok(())
}
