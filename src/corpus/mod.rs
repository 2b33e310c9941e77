use std::collections::BTreeMap;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Result, SigscanError};

/// The full set of rule sources gathered for one compilation run.
///
/// Keys are the rule files' paths relative to the walk root, which makes
/// them unique within a run and lets the compiler attribute errors to a
/// file. Each file's text is read once and consumed once.
#[derive(Debug, Clone, Default)]
pub struct RuleCorpus {
    sources: BTreeMap<String, String>,
}

impl RuleCorpus {
    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.sources.insert(id.into(), text.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sources.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

fn is_rule_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("yar") || e.eq_ignore_ascii_case("yara"))
        .unwrap_or(false)
}

/// Recursively gather every `.yar`/`.yara` file under `root`.
///
/// Reads are lenient: invalid UTF-8 is replaced rather than rejected, and a
/// file that cannot be read at all is skipped with a warning so one bad file
/// does not sink the corpus. An empty corpus is fatal, though; compiling
/// zero rules would silently report a clean scan.
pub fn collect(root: &Path) -> Result<RuleCorpus> {
    let mut corpus = RuleCorpus::default();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_rule_file(entry.path()) {
            continue;
        }
        match std::fs::read(entry.path()) {
            Ok(bytes) => {
                let id = entry
                    .path()
                    .strip_prefix(root)
                    .unwrap_or_else(|_| entry.path())
                    .display()
                    .to_string();
                corpus.insert(id, String::from_utf8_lossy(&bytes).into_owned());
            }
            Err(e) => {
                tracing::warn!(
                    file = %entry.path().display(),
                    error = %e,
                    "skipping unreadable rule file"
                );
            }
        }
    }

    if corpus.is_empty() {
        return Err(SigscanError::NoRulesFound(root.to_path_buf()));
    }

    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn collects_both_extensions_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.yar"), "rule a { condition: true }").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(
            dir.path().join("sub/b.yara"),
            "rule b { condition: false }",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "not a rule").unwrap();

        let corpus = collect(dir.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        let ids: Vec<&str> = corpus.iter().map(|(id, _)| id).collect();
        assert!(ids.contains(&"a.yar"));
        assert!(ids.contains(&"sub/b.yara"));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("upper.YAR"), "rule u { condition: true }").unwrap();
        let corpus = collect(dir.path()).unwrap();
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.yar"), b"rule x { \xff\xfe condition: true }").unwrap();
        let corpus = collect(dir.path()).unwrap();
        let (_, text) = corpus.iter().next().unwrap();
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn empty_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect(dir.path()).unwrap_err();
        assert!(matches!(err, SigscanError::NoRulesFound(_)));
    }

    #[test]
    fn non_rule_files_alone_still_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.md"), "# rules").unwrap();
        let err = collect(dir.path()).unwrap_err();
        assert!(matches!(err, SigscanError::NoRulesFound(_)));
    }
}
