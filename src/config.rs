//! Dump targets and path lookup.

use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Directory holding the default targets.
pub const DEFAULT_BASE_DIR: &str = "/home/user/SCMS2";

/// Default spreadsheet file name.
pub const DEFAULT_TABULAR_FILE: &str = "중앙 2팀 요구사항정의서 (1).xlsx";

/// Default word-processing document file name.
pub const DEFAULT_FLOW_FILE: &str = "01_학생역량관리시스템_프로젝트수행계획서_v1.0_20251027 (1).docx";

/// The spreadsheet and document a run reads.
///
/// # Example
///
/// ```
/// use docdump::Targets;
///
/// let targets = Targets::default()
///     .with_base_dir("/data")
///     .with_flow("/tmp/plan.docx");
///
/// assert!(targets.tabular.starts_with("/data"));
/// assert_eq!(targets.flow.to_str(), Some("/tmp/plan.docx"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Targets {
    pub tabular: PathBuf,
    pub flow: PathBuf,
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            tabular: Path::new(DEFAULT_BASE_DIR).join(DEFAULT_TABULAR_FILE),
            flow: Path::new(DEFAULT_BASE_DIR).join(DEFAULT_FLOW_FILE),
        }
    }
}

impl Targets {
    /// Targets with explicit paths.
    pub fn new(tabular: impl Into<PathBuf>, flow: impl Into<PathBuf>) -> Self {
        Self {
            tabular: tabular.into(),
            flow: flow.into(),
        }
    }

    /// Move both targets into `dir`, keeping their file names.
    pub fn with_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.tabular = rebase(&self.tabular, dir);
        self.flow = rebase(&self.flow, dir);
        self
    }

    /// Replace the spreadsheet target.
    pub fn with_tabular(mut self, path: impl Into<PathBuf>) -> Self {
        self.tabular = path.into();
        self
    }

    /// Replace the word-processing target.
    pub fn with_flow(mut self, path: impl Into<PathBuf>) -> Self {
        self.flow = path.into();
        self
    }
}

fn rebase(path: &Path, dir: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => dir.join(name),
        None => dir.to_path_buf(),
    }
}

/// Find an existing file for `path`.
///
/// Tries the path as given, then its NFC and NFD forms. Hangul names copied
/// from some filesystems arrive decomposed and would otherwise miss.
pub fn locate(path: &Path) -> Option<PathBuf> {
    if path.exists() {
        return Some(path.to_path_buf());
    }

    let text = path.to_str()?;
    let composed: String = text.nfc().collect();
    let decomposed: String = text.nfd().collect();

    [composed, decomposed]
        .into_iter()
        .filter(|candidate| candidate != text)
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}
