use crate::core::transcript::CaptionSegment;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_WORDS: usize = 800;

/// A contiguous run of caption segments merged into one block of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl Chunk {
    pub fn word_count(&self) -> usize {
        count_words(&self.text)
    }
}

/// Lazily folds caption segments into chunks of roughly `max_words` words.
///
/// A chunk closes as soon as its running word count reaches `max_words`; the
/// segment that crossed the threshold is kept in the chunk and its start time
/// becomes the chunk's `end`. Segments are never split, so one long caption
/// can make up a whole chunk on its own.
///
/// A chunk's `start` is the start of its own first segment, never the start
/// of the segment that closed the previous chunk.
pub struct Chunks<'a> {
    segments: &'a [CaptionSegment],
    max_words: usize,
    position: usize,
}

impl<'a> Chunks<'a> {
    pub fn new(segments: &'a [CaptionSegment], max_words: usize) -> Result<Self> {
        if segments.is_empty() {
            return Err(Error::EmptyTranscript);
        }
        if max_words == 0 {
            return Err(Error::custom("max_words must be greater than zero"));
        }

        Ok(Self {
            segments,
            max_words,
            position: 0,
        })
    }
}

impl Iterator for Chunks<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let first = self.segments.get(self.position)?;
        let start = first.start;

        let mut texts: Vec<&str> = Vec::new();
        let mut word_count = 0;

        while let Some(segment) = self.segments.get(self.position) {
            self.position += 1;
            texts.push(&segment.text);
            word_count += count_words(&segment.text);

            if word_count >= self.max_words {
                return Some(Chunk {
                    text: texts.join(" "),
                    start,
                    end: segment.start,
                });
            }
        }

        // Ran out of segments with a partial chunk in hand.
        let last = self.segments.last()?;
        Some(Chunk {
            text: texts.join(" "),
            start,
            end: last.start,
        })
    }
}

/// Eagerly chunks a transcript.
pub fn chunk_transcript(segments: &[CaptionSegment], max_words: usize) -> Result<Vec<Chunk>> {
    Ok(Chunks::new(segments, max_words)?.collect())
}

/// Joins chunk texts in order, the input of the executive summary.
pub fn full_text(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
