//! Sources of reference passages.
//!
//! A [`TextProvider`] hands out one normalized, non-empty passage at a time
//! together with a label naming where it came from. Providers know nothing
//! about sessions; the driver turns a [`Passage`] into a session and shows
//! a [`CorpusError`] on the error screen.

pub mod directory;
pub mod embedded;

use std::path::PathBuf;

use icu_normalizer::ComposingNormalizerBorrowed;
use thiserror::Error;

use crate::config::Config;

pub use directory::DirectoryCorpus;
pub use embedded::EmbeddedCorpus;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Passage {
    pub text: String,
    pub source: String,
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("no tests directory with .txt passages found (looked in {})", display_paths(.0))]
    NoTestsDir(Vec<PathBuf>),
    #[error("no .txt files in {}", .0.display())]
    NoCandidates(PathBuf),
    #[error("every .txt file in {} is empty", .0.display())]
    AllEmpty(PathBuf),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no bundled passages available")]
    NoBundledTexts,
    #[error("no text source configured")]
    NoProviders,
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub trait TextProvider {
    fn next_text(&mut self) -> Result<Passage, CorpusError>;
}

/// Canonical form of a passage: LF line endings, NFC, no surrounding
/// whitespace. Typed input is compared code point by code point, so the
/// reference must not contain decomposed sequences the keyboard never
/// produces.
pub fn normalize_text(raw: &str) -> String {
    let unix = raw.replace("\r\n", "\n").replace('\r', "\n");
    let composed = ComposingNormalizerBorrowed::new_nfc().normalize(&unix);
    composed.trim().to_string()
}

/// Tries each provider in order and returns the first passage.
pub struct FallbackCorpus {
    providers: Vec<Box<dyn TextProvider>>,
}

impl FallbackCorpus {
    pub fn new(providers: Vec<Box<dyn TextProvider>>) -> Self {
        Self { providers }
    }

    /// Directory corpus (configured or discovered) first, then the bundled
    /// passages when enabled.
    pub fn from_config(config: &Config, seed: Option<u64>) -> Self {
        let mut providers: Vec<Box<dyn TextProvider>> = Vec::new();
        let directory = match config.tests_dir() {
            Some(dir) => DirectoryCorpus::new(dir, seed),
            None => DirectoryCorpus::discovering(seed),
        };
        providers.push(Box::new(directory));
        if config.use_bundled_texts {
            providers.push(Box::new(EmbeddedCorpus::new(seed)));
        }
        Self::new(providers)
    }
}

impl TextProvider for FallbackCorpus {
    fn next_text(&mut self) -> Result<Passage, CorpusError> {
        let mut last_err = CorpusError::NoProviders;
        for provider in &mut self.providers {
            match provider.next_text() {
                Ok(passage) => return Ok(passage),
                Err(err) => {
                    tracing::warn!(target: "corpus", %err, "provider_failed");
                    last_err = err;
                }
            }
        }
        Err(last_err)
    }
}
