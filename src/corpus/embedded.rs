use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rust_embed::Embed;

use crate::corpus::directory::make_rng;
use crate::corpus::{CorpusError, Passage, TextProvider, normalize_text};

#[derive(Embed)]
#[folder = "assets/texts/"]
struct TextAssets;

/// Passages compiled into the binary, used when no directory is available.
pub struct EmbeddedCorpus {
    rng: SmallRng,
}

impl EmbeddedCorpus {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: make_rng(seed),
        }
    }

    pub fn names() -> Vec<String> {
        let mut names: Vec<String> = TextAssets::iter().map(|name| name.into_owned()).collect();
        names.sort();
        names
    }
}

impl TextProvider for EmbeddedCorpus {
    fn next_text(&mut self) -> Result<Passage, CorpusError> {
        let mut names = Self::names();
        names.shuffle(&mut self.rng);
        for name in names {
            let Some(file) = TextAssets::get(&name) else {
                continue;
            };
            let Ok(raw) = std::str::from_utf8(file.data.as_ref()) else {
                continue;
            };
            let text = normalize_text(raw);
            if text.is_empty() {
                continue;
            }
            tracing::info!(target: "corpus", source = %name, "bundled_passage_selected");
            return Ok(Passage {
                text,
                source: format!("{name} (bundled)"),
            });
        }
        Err(CorpusError::NoBundledTexts)
    }
}
