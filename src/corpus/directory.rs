use std::fs;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::corpus::{CorpusError, Passage, TextProvider, normalize_text};

const TESTS_DIR_NAME: &str = "tests";

/// Places searched for a tests directory when none is configured:
/// `./tests`, then `tests` next to the executable, then one level up.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(TESTS_DIR_NAME)];
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        paths.push(exe_dir.join(TESTS_DIR_NAME));
        paths.push(exe_dir.join("..").join(TESTS_DIR_NAME));
    }
    paths
}

/// First directory in `paths` holding at least one `.txt` file. Directories
/// with no passages (a cargo `tests/` of `.rs` files, say) are passed over.
pub fn discover_in(paths: &[PathBuf]) -> Result<PathBuf, CorpusError> {
    paths
        .iter()
        .find(|path| {
            path.is_dir() && list_candidates(path).is_ok_and(|files| !files.is_empty())
        })
        .cloned()
        .ok_or_else(|| CorpusError::NoTestsDir(paths.to_vec()))
}

pub fn discover_tests_dir() -> Result<PathBuf, CorpusError> {
    discover_in(&search_paths())
}

fn is_text_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

/// `.txt` files directly inside `dir`, sorted by name.
pub fn list_candidates(dir: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    let entries = fs::read_dir(dir).map_err(|source| CorpusError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_text_file(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Random passages from a directory of `.txt` files.
pub struct DirectoryCorpus {
    /// `None` re-runs discovery on every request.
    dir: Option<PathBuf>,
    rng: SmallRng,
}

impl DirectoryCorpus {
    pub fn new(dir: PathBuf, seed: Option<u64>) -> Self {
        Self {
            dir: Some(dir),
            rng: make_rng(seed),
        }
    }

    pub fn discovering(seed: Option<u64>) -> Self {
        Self {
            dir: None,
            rng: make_rng(seed),
        }
    }

    fn pick_from(&mut self, dir: &Path) -> Result<Passage, CorpusError> {
        let mut candidates = list_candidates(dir)?;
        if candidates.is_empty() {
            return Err(CorpusError::NoCandidates(dir.to_path_buf()));
        }
        candidates.shuffle(&mut self.rng);

        for path in candidates {
            let raw = match fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(err) => {
                    tracing::warn!(target: "corpus", path = %path.display(), %err, "read_failed");
                    continue;
                }
            };
            let text = normalize_text(&raw);
            if text.is_empty() {
                tracing::debug!(target: "corpus", path = %path.display(), "skip_empty");
                continue;
            }
            let source = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            tracing::info!(target: "corpus", %source, chars = text.chars().count(), "passage_selected");
            return Ok(Passage { text, source });
        }

        Err(CorpusError::AllEmpty(dir.to_path_buf()))
    }
}

impl TextProvider for DirectoryCorpus {
    fn next_text(&mut self) -> Result<Passage, CorpusError> {
        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => discover_tests_dir()?,
        };
        self.pick_from(&dir)
    }
}

pub(crate) fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn lists_only_txt_files_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "alpha");
        write(dir.path(), "B.TXT", "beta");
        write(dir.path(), "notes.md", "skip");
        write(dir.path(), "txt", "skip");
        fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let names: Vec<String> = list_candidates(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["B.TXT", "a.txt"]);
    }

    #[test]
    fn picks_and_normalizes_a_passage() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "only.txt", "\r\n  line one\r\nline two  \r\n");
        let mut corpus = DirectoryCorpus::new(dir.path().to_path_buf(), Some(7));
        let passage = corpus.next_text().unwrap();
        assert_eq!(passage.text, "line one\nline two");
        assert_eq!(passage.source, "only.txt");
    }

    #[test]
    fn skips_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "blank1.txt", "");
        write(dir.path(), "blank2.txt", " \n\t\n");
        write(dir.path(), "real.txt", "content");
        for seed in 0..10 {
            let mut corpus = DirectoryCorpus::new(dir.path().to_path_buf(), Some(seed));
            assert_eq!(corpus.next_text().unwrap().source, "real.txt");
        }
    }

    #[test]
    fn all_empty_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "blank.txt", "\n\n");
        let mut corpus = DirectoryCorpus::new(dir.path().to_path_buf(), Some(1));
        assert!(matches!(corpus.next_text(), Err(CorpusError::AllEmpty(_))));
    }

    #[test]
    fn no_candidates_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut corpus = DirectoryCorpus::new(dir.path().to_path_buf(), Some(1));
        assert!(matches!(
            corpus.next_text(),
            Err(CorpusError::NoCandidates(_))
        ));
    }

    #[test]
    fn missing_dir_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut corpus = DirectoryCorpus::new(dir.path().join("gone"), Some(1));
        assert!(matches!(corpus.next_text(), Err(CorpusError::Io { .. })));
    }

    #[test]
    fn same_seed_same_choice() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..8 {
            write(dir.path(), &format!("{i}.txt"), &format!("passage {i}"));
        }
        let picks = |seed| {
            let mut corpus = DirectoryCorpus::new(dir.path().to_path_buf(), Some(seed));
            (0..5)
                .map(|_| corpus.next_text().unwrap().source)
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(42), picks(42));
    }

    #[test]
    fn discovery_takes_first_dir_with_passages() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("missing");
        let code_only = root.path().join("code-only");
        let texts = root.path().join("texts");
        let more = root.path().join("more-texts");
        for dir in [&code_only, &texts, &more] {
            fs::create_dir(dir).unwrap();
        }
        write(&code_only, "session_flow.rs", "fn main() {}");
        write(&texts, "one.txt", "one");
        write(&more, "two.txt", "two");

        let found = discover_in(&[missing.clone(), code_only.clone(), texts.clone(), more]).unwrap();
        assert_eq!(found, texts);
        assert!(matches!(
            discover_in(&[missing, code_only]),
            Err(CorpusError::NoTestsDir(paths)) if paths.len() == 2
        ));
    }

    #[test]
    fn search_starts_in_working_dir() {
        assert_eq!(search_paths()[0], PathBuf::from("tests"));
    }
}
