#![allow(dead_code)]

use std::process::Command;
use std::sync::Arc;

use chronoport::migrate::catalog::joda;
use chronoport::migrate::pipeline::{Phase, Pipeline};
use chronoport::migrate::{Engine, MappingLog};

pub fn chronoport() -> Command {
    Command::new(env!("CARGO_BIN_EXE_chronoport"))
}

/// Full pipeline with the built-in catalog.
pub fn migrate(source: &str) -> (String, MappingLog) {
    chronoport::migrate_joda_source(source).unwrap()
}

pub fn migrate_text(source: &str) -> String {
    migrate(source).0
}

/// Built-in catalog, phases run in the given order.
pub fn migrate_with_phases(source: &str, phases: &[Phase]) -> (String, MappingLog) {
    let catalog = Arc::new(joda::catalog().unwrap());
    let engine = Engine::new(catalog.clone(), Pipeline::joda(catalog).with_phases(phases));
    chronoport::migrate_source(source, &engine).unwrap()
}
