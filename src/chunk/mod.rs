//! Text partitioning.
//!
//! Splits an oversized text into an ordered sequence of bounded fragments so
//! each piece fits in a single LLM call. One generic function serves both the
//! raw code text and accumulated summaries between reduction rounds.

use crate::domain::{Fragment, MIN_FRAGMENT_LEN};

/// Split `text` into fragments no longer than `max_chunk_size` characters.
///
/// Texts at or under the bound come back as a single fragment, unchanged —
/// including the empty text, which is a valid single empty fragment. Longer
/// texts are cut at a fixed stride of `len / num_chunks` characters, where
/// `num_chunks` is the smallest integer >= 2 that brings the per-chunk share
/// within the bound; the final fragment absorbs the division remainder. A
/// trailing fragment shorter than [`MIN_FRAGMENT_LEN`] is dropped outright,
/// never merged into its predecessor.
///
/// Lengths count Unicode scalar values, and cuts land on char boundaries.
pub fn partition(text: &str, max_chunk_size: usize) -> Vec<Fragment> {
    assert!(max_chunk_size > 0, "chunk bound must be positive");

    let len = text.chars().count();
    if len <= max_chunk_size {
        return vec![Fragment::new(0, text.to_string())];
    }

    // Smallest num_chunks >= 2 with len / num_chunks <= max_chunk_size in
    // real arithmetic: len / n > max  <=>  len > n * max.
    let mut num_chunks = 2usize;
    while len > num_chunks * max_chunk_size {
        num_chunks += 1;
    }
    let chunk_size = len / num_chunks;

    // Byte offsets of each stride start; the final fragment runs to the end.
    let mut marks = Vec::with_capacity(num_chunks + 1);
    marks.push(0);
    for (count, (byte_idx, _)) in text.char_indices().enumerate() {
        if count > 0 && count % chunk_size == 0 && marks.len() < num_chunks {
            marks.push(byte_idx);
        }
    }
    marks.push(text.len());

    let mut fragments: Vec<Fragment> = marks
        .windows(2)
        .enumerate()
        .map(|(seq, pair)| Fragment::new(seq, text[pair[0]..pair[1]].to_string()))
        .collect();

    if fragments.last().is_some_and(|last| last.len_chars() < MIN_FRAGMENT_LEN) {
        fragments.pop();
    }

    fragments
}
