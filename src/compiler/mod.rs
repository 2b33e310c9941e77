use crate::corpus::RuleCorpus;
use crate::engine::{CompileFailure, MatchEngine};
use crate::error::{Result, SigscanError};
use crate::externals::ExternalVars;

/// Compile the corpus, discovering undeclared external variables as it goes.
///
/// Rule corpora are authored independently and routinely assume contextual
/// variables the caller never heard of. Instead of requiring the full set up
/// front, each compile failure naming an undefined identifier registers that
/// identifier with an empty-string default and the compile is retried.
///
/// The registry doubles as the visited set: it only grows, and a name
/// already present when its error comes back means the default did not take
/// (changed message format, reserved token collision). That case aborts
/// rather than retrying, which bounds the loop at k+1 attempts for k
/// distinct undeclared identifiers.
pub fn compile_with_discovery<E: MatchEngine>(
    engine: &E,
    corpus: &RuleCorpus,
    externals: &mut ExternalVars,
) -> Result<E::Compiled> {
    loop {
        match engine.compile(corpus, externals) {
            Ok(compiled) => return Ok(compiled),
            Err(CompileFailure::UndefinedIdentifier {
                identifier,
                message,
            }) => {
                if externals.contains(&identifier) {
                    return Err(SigscanError::UndefinedIdentifierLoop {
                        identifier,
                        message,
                    });
                }
                tracing::debug!(
                    identifier = %identifier,
                    "defaulting undeclared external variable"
                );
                externals.define_default(&identifier);
            }
            Err(CompileFailure::Other(message)) => {
                return Err(SigscanError::Compile(message));
            }
        }
    }
}
