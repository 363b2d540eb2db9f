//! Joda-Time to `java.time` migration engine.
//!
//! The catalog is built once and shared read-only; each compilation unit is attributed and
//! pushed through the rule pipeline independently, so units can be migrated in parallel by
//! separate `Engine` clones.

pub mod catalog;
pub mod events;
pub mod imports;
pub mod pattern;
pub mod pipeline;
pub mod type_map;
pub mod visitor;

use std::sync::Arc;

use tracing::debug;

use crate::config::MigrateConfig;
use crate::diagnostics::MigrateError;
use crate::parser::ast::CompilationUnit;
use crate::parser::parse;
use crate::pretty::print_unit;
use crate::typeck::attribute;

use self::catalog::Catalog;
use self::events::EventSink;
use self::pipeline::{Phase, Pipeline};

pub use self::catalog::Resolution;
pub use self::events::{MappingEvent, MappingLog, Severity};

#[derive(Clone)]
pub struct Engine {
    catalog: Arc<Catalog>,
    pipeline: Arc<Pipeline>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("catalog", &self.catalog).finish_non_exhaustive()
    }
}

impl Engine {
    /// The built-in Joda-Time catalog with every phase enabled.
    pub fn joda() -> Result<Self, MigrateError> {
        let catalog = Arc::new(catalog::joda::catalog()?);
        let pipeline = Pipeline::joda(catalog.clone());
        Ok(Self::new(catalog, pipeline))
    }

    pub fn new(catalog: Arc<Catalog>, pipeline: Pipeline) -> Self {
        Self { catalog, pipeline: Arc::new(pipeline) }
    }

    /// Built-in catalog restricted by `[migrate]` settings. Unknown family names are a config error.
    pub fn from_config(config: &MigrateConfig) -> Result<Self, MigrateError> {
        let catalog = Arc::new(catalog::joda::catalog()?);
        let mut pipeline = Pipeline::joda(catalog.clone());
        if let Some(families) = &config.families {
            if let Some(unknown) = families.iter().find(|f| catalog.family(f).is_none()) {
                return Err(MigrateError::config(
                    format!("unknown family `{unknown}`"),
                    config.source.clone().unwrap_or_default(),
                ));
            }
            pipeline = pipeline.only_families(families);
        }
        if config.skip_type_substitution {
            pipeline = pipeline.without(Phase::TypeSubstitution);
        }
        debug!(rules = pipeline.rule_names().len(), "engine configured");
        Ok(Self::new(catalog, pipeline))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Attribute a parsed unit against the catalog's classpath and run the pipeline over it.
    pub fn migrate_unit(&self, unit: CompilationUnit, sink: &mut dyn EventSink) -> CompilationUnit {
        let unit = attribute(unit, self.catalog.classpath());
        self.pipeline.run(unit, sink)
    }

    /// Parse, migrate and print one source file.
    pub fn migrate_source(&self, source: &str, sink: &mut dyn EventSink) -> Result<String, MigrateError> {
        let unit = parse(source)?;
        Ok(print_unit(&self.migrate_unit(unit, sink)))
    }
}

/// Convenience wrapper collecting events into a fresh log.
pub fn migrate_source(source: &str, engine: &Engine) -> Result<(String, MappingLog), MigrateError> {
    let mut log = MappingLog::new();
    let out = engine.migrate_source(source, &mut log)?;
    Ok((out, log))
}
