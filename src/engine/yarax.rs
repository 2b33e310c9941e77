use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CompileFailure, MatchEngine};
use crate::corpus::RuleCorpus;
use crate::error::{Result, SigscanError};
use crate::externals::ExternalVars;
use crate::report::MatchRecord;

/// Matches libyara's `undefined identifier "x"` as well as yara-x's
/// ``unknown identifier `x` `` wording.
static UNDEFINED_IDENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:undefined|unknown) identifier [`"]([A-Za-z0-9_]+)[`"]"#).unwrap()
});

/// Classify a compile-error message: recoverable undefined identifier, or
/// anything else.
fn classify(message: String) -> CompileFailure {
    let identifier = UNDEFINED_IDENT_RE
        .captures(&message)
        .map(|caps| caps[1].to_string());
    match identifier {
        Some(identifier) => CompileFailure::UndefinedIdentifier {
            identifier,
            message,
        },
        None => CompileFailure::Other(message),
    }
}

/// Adapter over the yara-x compiler and scanner.
#[derive(Debug, Default)]
pub struct YaraEngine;

impl YaraEngine {
    pub fn new() -> Self {
        Self
    }
}

impl MatchEngine for YaraEngine {
    type Compiled = yara_x::Rules;

    fn compile(
        &self,
        corpus: &RuleCorpus,
        externals: &ExternalVars,
    ) -> std::result::Result<Self::Compiled, CompileFailure> {
        let mut compiler = yara_x::Compiler::new();

        // Globals must be in place before any source that references them.
        for (name, value) in externals.iter() {
            compiler
                .define_global(name, value)
                .map_err(|e| CompileFailure::Other(e.to_string()))?;
        }

        // Each file compiles in its own namespace, so independently authored
        // corpora may reuse rule names without clashing.
        for (id, text) in corpus.iter() {
            compiler.new_namespace(id);
            let source = yara_x::SourceCode::from(text).with_origin(id);
            if let Err(e) = compiler.add_source(source) {
                return Err(classify(e.to_string()));
            }
        }

        Ok(compiler.build())
    }

    fn scan(&self, compiled: &Self::Compiled, target: &Path) -> Result<Vec<MatchRecord>> {
        let mut scanner = yara_x::Scanner::new(compiled);
        let results = scanner
            .scan_file(target)
            .map_err(|e| SigscanError::Scan(e.to_string()))?;

        let records = results
            .matching_rules()
            .map(|rule| MatchRecord {
                rule: rule.identifier().to_string(),
                tags: rule
                    .tags()
                    .map(|t| t.identifier().to_string())
                    .collect(),
                meta: rule
                    .metadata()
                    .map(|(key, value)| (key.to_string(), meta_to_string(value)))
                    .collect(),
            })
            .collect();

        Ok(records)
    }
}

fn meta_to_string(value: yara_x::MetaValue) -> String {
    match value {
        yara_x::MetaValue::Integer(i) => i.to_string(),
        yara_x::MetaValue::Float(f) => f.to_string(),
        yara_x::MetaValue::Bool(b) => b.to_string(),
        yara_x::MetaValue::String(s) => s.to_string(),
        yara_x::MetaValue::Bytes(b) => b.to_string(),
    }
}
