//! Text corpus for the sliding-window benchmarks.
//!
//! A user-supplied file is memory-mapped and copied out; without one, a
//! deterministic built-in text is synthesized so the window benchmarks
//! always have data to stream.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use memmap2::Mmap;

/// Size of the synthesized corpus.
const SYNTHETIC_TARGET: usize = 1 << 18;

/// Paragraphs cycled to build the synthetic corpus. A mix of window hits
/// (names, "-ing" words) and misses keeps the benchmark patterns honest.
const PARAGRAPHS: [&str; 8] = [
    "Sherlock Holmes took his bottle from the corner of the mantel-piece.\n",
    "The portly client puffed out his chest with an appearance of some little pride.\n",
    "Watson was standing at the window, looking down into the dull neutral-tinted street.\n",
    "I had called upon my friend upon a certain October morning without warning.\n",
    "He was still, as ever, deeply attracted by the study of crime, occupying his immense faculties.\n",
    "To Holmes every unsolved puzzle was an irritant, and Watson knew better than to interrupt his thinking.\n",
    "The lamp was burning brightly while rain kept drumming on the glass.\n",
    "Nothing of interest appeared in the papers that particular week.\n",
];

/// Load the corpus from `path`, or synthesize the built-in text.
pub fn load(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open corpus {}", path.display()))?;
            // SAFETY: the mapping is read once and copied; corpus files are
            // not expected to be mutated mid-run.
            let mmap = unsafe { Mmap::map(&file) }
                .with_context(|| format!("Failed to map corpus {}", path.display()))?;
            println!("[corpus] Mapped {} bytes from {}", mmap.len(), path.display());
            Ok(mmap.to_vec())
        }
        None => {
            let text = synthetic();
            println!("[corpus] Using built-in text ({} bytes)", text.len());
            Ok(text)
        }
    }
}

fn synthetic() -> Vec<u8> {
    let mut text = Vec::with_capacity(SYNTHETIC_TARGET + 128);
    let mut index = 0;
    while text.len() < SYNTHETIC_TARGET {
        text.extend_from_slice(PARAGRAPHS[index % PARAGRAPHS.len()].as_bytes());
        index += 1;
    }
    text
}
