pub mod span;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod pretty;
pub mod visit;
pub mod typeck;
pub mod template;
pub mod migrate;
pub mod config;
pub mod batch;

use diagnostics::MigrateError;
use migrate::{Engine, MappingLog};

pub use migrate::migrate_source;

/// Migrate a source string with the built-in catalog and every phase enabled
/// (lex → parse → attribute → rename → structural families → type substitution → print).
pub fn migrate_joda_source(source: &str) -> Result<(String, MappingLog), MigrateError> {
    let engine = Engine::joda()?;
    migrate_source(source, &engine)
}
