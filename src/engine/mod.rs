pub mod yarax;

use std::path::Path;

use crate::corpus::RuleCorpus;
use crate::error::Result;
use crate::externals::ExternalVars;
use crate::report::MatchRecord;

pub use yarax::YaraEngine;

/// Why a compilation attempt failed, as far as the retry loop cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileFailure {
    /// The corpus references an external variable that was not supplied.
    /// Recoverable: the caller may default it and try again.
    UndefinedIdentifier { identifier: String, message: String },
    /// Anything else (syntax error, bad variable, ...). Not recoverable.
    Other(String),
}

/// The pattern-matching capability, kept behind a narrow seam so the
/// compile-retry loop and the reporter can be exercised without linking a
/// real engine.
pub trait MatchEngine {
    type Compiled;

    /// Compile the whole corpus against the given external variables.
    fn compile(
        &self,
        corpus: &RuleCorpus,
        externals: &ExternalVars,
    ) -> std::result::Result<Self::Compiled, CompileFailure>;

    /// Scan the target file with a compiled rule set. The engine owns the
    /// file I/O for this step; records come back in the engine's order.
    fn scan(&self, compiled: &Self::Compiled, target: &Path) -> Result<Vec<MatchRecord>>;
}
