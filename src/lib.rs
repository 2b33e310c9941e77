//! sigscan — scan a file against a directory of YARA rules.
//!
//! Rule files are gathered recursively, compiled as one rule set, and run
//! against the target. Rules may reference external variables the caller
//! never declared: the compiler discovers them from compile errors, defaults
//! them to empty strings, and retries, so independently authored corpora
//! (signature-base and friends) work without a hand-maintained variable
//! list.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use sigscan::{scan, ScanOptions};
//!
//! let options = ScanOptions::default();
//! let report = scan(Path::new("./sample.exe"), &options).unwrap();
//! println!("Rules: {}, Detections: {}", report.rule_count, report.detections());
//! ```

pub mod compiler;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod externals;
pub mod output;
pub mod report;

use std::path::{Path, PathBuf};

use config::Config;
use engine::{MatchEngine, YaraEngine};
use error::{Result, SigscanError};
use externals::ExternalVars;
use output::OutputFormat;
pub use report::{MatchRecord, ScanReport, DETECTIONS_EXIT_CODE};

/// Options for a scan invocation.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Path to config file (defaults to `.sigscan.toml` in the working dir).
    pub config_path: Option<PathBuf>,
    /// Rules directory override; wins over the config file.
    pub rules_dir: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            rules_dir: None,
            format: OutputFormat::Console,
        }
    }
}

/// Run a complete scan: collect rules, compile with variable discovery,
/// match against the target.
pub fn scan(target: &Path, options: &ScanOptions) -> Result<ScanReport> {
    // Existence is checked before any rule I/O so a bad target fails fast
    // with its own status.
    let target = std::path::absolute(target)?;
    if !target.exists() {
        return Err(SigscanError::TargetNotFound(target));
    }

    let config_path = options
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(".sigscan.toml"));
    let config = Config::load(&config_path)?;
    let rules_dir = options.rules_dir.clone().unwrap_or(config.rules_dir);

    let corpus = corpus::collect(&rules_dir)?;
    let mut externals = ExternalVars::seed(&target);

    let engine = YaraEngine::new();
    let compiled = compiler::compile_with_discovery(&engine, &corpus, &mut externals)?;
    let matches = engine.scan(&compiled, &target)?;

    Ok(ScanReport {
        rule_count: corpus.len(),
        target,
        matches,
    })
}

/// Render a scan report in the specified format.
pub fn render_report(report: &ScanReport, format: OutputFormat) -> Result<String> {
    output::render(report, format)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::fs;

    fn options(rules_dir: &Path) -> ScanOptions {
        ScanOptions {
            rules_dir: Some(rules_dir.to_path_buf()),
            ..ScanOptions::default()
        }
    }

    #[test]
    fn missing_target_fails_before_rule_io() {
        let err = scan(
            Path::new("/definitely/not/here.bin"),
            &options(Path::new("/also/not/here")),
        )
        .unwrap_err();
        assert!(matches!(err, SigscanError::TargetNotFound(_)));
    }

    #[test]
    fn empty_rules_dir_is_no_rules_found() {
        let rules = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let target = work.path().join("sample.exe");
        fs::write(&target, b"hello").unwrap();

        let err = scan(&target, &options(rules.path())).unwrap_err();
        assert!(matches!(err, SigscanError::NoRulesFound(_)));
    }

    #[test]
    fn string_match_reports_rule_tags_and_meta() {
        let rules = tempfile::tempdir().unwrap();
        fs::write(
            rules.path().join("magic.yar"),
            r#"
rule has_magic : suspect demo {
    meta:
        author = "unit"
        score = 70
    strings:
        $a = "MAGICMARK"
    condition:
        $a
}
"#,
        )
        .unwrap();

        let work = tempfile::tempdir().unwrap();
        let target = work.path().join("sample.exe");
        fs::write(&target, b"xx MAGICMARK xx").unwrap();

        let report = scan(&target, &options(rules.path())).unwrap();
        assert_eq!(report.rule_count, 1);
        assert_eq!(report.detections(), 1);
        assert_eq!(report.exit_code(), DETECTIONS_EXIT_CODE);

        let m = &report.matches[0];
        assert_eq!(m.rule, "has_magic");
        assert_eq!(m.tags, vec!["suspect".to_string(), "demo".to_string()]);
        assert!(m.meta.contains(&("author".into(), "unit".into())));
        assert!(m.meta.contains(&("score".into(), "70".into())));
    }

    #[test]
    fn seeded_external_drives_a_match() {
        let rules = tempfile::tempdir().unwrap();
        fs::write(
            rules.path().join("ext.yar"),
            r#"rule exe_target { condition: extension == "exe" }"#,
        )
        .unwrap();

        let work = tempfile::tempdir().unwrap();
        let target = work.path().join("sample.exe");
        fs::write(&target, b"payload").unwrap();

        let report = scan(&target, &options(rules.path())).unwrap();
        assert_eq!(report.detections(), 1);
        assert_eq!(report.matches[0].rule, "exe_target");
    }

    #[test]
    fn undeclared_external_is_discovered_and_defaulted() {
        let rules = tempfile::tempdir().unwrap();
        fs::write(
            rules.path().join("needs_owner.yar"),
            r#"rule owned_by_evil { condition: owner == "evil" }"#,
        )
        .unwrap();

        let work = tempfile::tempdir().unwrap();
        let target = work.path().join("sample.exe");
        fs::write(&target, b"payload").unwrap();

        // Compiles after one discovery round; the empty-string default makes
        // the condition false, so the scan is clean.
        let report = scan(&target, &options(rules.path())).unwrap();
        assert_eq!(report.rule_count, 1);
        assert_eq!(report.detections(), 0);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn clean_scan_over_several_files_exits_zero() {
        let rules = tempfile::tempdir().unwrap();
        for i in 0..3 {
            fs::write(
                rules.path().join(format!("r{}.yar", i)),
                format!("rule never_{} {{ strings: $a = \"ZZZ{}\" condition: $a }}", i, i),
            )
            .unwrap();
        }

        let work = tempfile::tempdir().unwrap();
        let target = work.path().join("clean.bin");
        fs::write(&target, b"nothing interesting").unwrap();

        let report = scan(&target, &options(rules.path())).unwrap();
        assert_eq!(report.rule_count, 3);
        assert_eq!(report.detections(), 0);
        assert_eq!(report.exit_code(), 0);
    }
}
