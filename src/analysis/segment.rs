//! Sentence-count segmentation for grammar review.
//!
//! Grammar review submits bounded chunks to the external service.
//! Chunks close after a fixed number of sentence terminators; both the
//! ASCII full stop and the Devanagari danda count.

/// Characters that end a Marathi sentence.
const TERMINATORS: &[char] = &['.', '।'];

/// Split `text` into chunks of roughly `sentences_per_segment`
/// sentences. A threshold of zero, or text without any terminator,
/// yields a single segment holding the whole text.
pub fn segment_by_sentences(text: &str, sentences_per_segment: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if sentences_per_segment == 0 {
        return vec![text.trim().to_string()];
    }

    let mut segments = Vec::new();
    let mut buffer = String::new();
    let mut count = 0;

    for ch in text.chars() {
        buffer.push(ch);
        if TERMINATORS.contains(&ch) {
            count += 1;
            if count >= sentences_per_segment {
                segments.push(buffer.trim().to_string());
                buffer.clear();
                count = 0;
            }
        }
    }

    let tail = buffer.trim();
    if !tail.is_empty() {
        segments.push(tail.to_string());
    }
    segments
}
