//! Multi-file migration: source discovery, a worker pool over a shared engine, and the
//! per-run report.

use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{bounded, unbounded};
use serde::Serialize;
use tracing::{debug, warn};

use crate::diagnostics::MigrateError;
use crate::migrate::{Engine, MappingEvent, MappingLog};

/// Collect `.java` files under `paths`. Directories are walked recursively; explicit file
/// arguments are taken as given. The result is sorted and free of duplicates.
pub fn collect_sources(paths: &[PathBuf]) -> Result<Vec<PathBuf>, MigrateError> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            walk(path, &mut files)?;
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(MigrateError::io(
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
                path.clone(),
            ));
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), MigrateError> {
    let entries = std::fs::read_dir(dir).map_err(|e| MigrateError::io(e, dir.to_path_buf()))?;
    for entry in entries {
        let path = entry.map_err(|e| MigrateError::io(e, dir.to_path_buf()))?.path();
        if path.is_dir() {
            let hidden = path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.starts_with('.'));
            if !hidden {
                walk(&path, out)?;
            }
        } else if path.extension().is_some_and(|ext| ext == "java") {
            out.push(path);
        }
    }
    Ok(())
}

/// What happened to one file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub source: String,
    pub result: Result<Migrated, MigrateError>,
}

#[derive(Debug)]
pub struct Migrated {
    pub output: String,
    pub events: Vec<MappingEvent>,
}

impl FileOutcome {
    pub fn changed(&self) -> bool {
        matches!(&self.result, Ok(m) if m.output != self.source)
    }

    pub fn events(&self) -> &[MappingEvent] {
        match &self.result {
            Ok(m) => &m.events,
            Err(_) => &[],
        }
    }
}

fn migrate_file(engine: &Engine, path: PathBuf) -> FileOutcome {
    let source = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            let err = MigrateError::io(e, path.clone());
            return FileOutcome { path, source: String::new(), result: Err(err) };
        }
    };
    let mut log = MappingLog::new();
    let result = engine
        .migrate_source(&source, &mut log)
        .map(|output| Migrated { output, events: log.into_events() });
    FileOutcome { path, source, result }
}

/// Migrate `files` on `jobs` worker threads. Each worker owns an `Engine` clone; clones share
/// the catalog. Outcomes come back in input order.
pub fn migrate_files(engine: &Engine, files: Vec<PathBuf>, jobs: usize) -> Vec<FileOutcome> {
    let jobs = jobs.clamp(1, files.len().max(1));
    let total = files.len();
    debug!(files = total, jobs, "starting batch");

    let (work_tx, work_rx) = bounded::<(usize, PathBuf)>(jobs * 2);
    let (done_tx, done_rx) = unbounded::<(usize, FileOutcome)>();

    thread::scope(|scope| {
        for worker in 0..jobs {
            let work_rx = work_rx.clone();
            let done_tx = done_tx.clone();
            let engine = engine.clone();
            scope.spawn(move || {
                for (index, path) in work_rx {
                    debug!(worker, path = %path.display(), "migrating");
                    if done_tx.send((index, migrate_file(&engine, path))).is_err() {
                        break;
                    }
                }
            });
        }
        drop(done_tx);

        for item in files.into_iter().enumerate() {
            if work_tx.send(item).is_err() {
                warn!("all workers exited early");
                break;
            }
        }
        drop(work_tx);
    });

    let mut outcomes: Vec<(usize, FileOutcome)> = done_rx.into_iter().collect();
    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}

// ---- Reporting ----

#[derive(Debug, Serialize)]
pub struct Report {
    pub files: Vec<FileReport>,
    pub changed: usize,
    pub events: usize,
    pub errors: usize,
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub events: Vec<MappingEvent>,
}

impl Report {
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        let files: Vec<FileReport> = outcomes
            .iter()
            .map(|o| FileReport {
                path: o.path.clone(),
                changed: o.changed(),
                error: o.result.as_ref().err().map(|e| e.to_string()),
                events: o.events().to_vec(),
            })
            .collect();
        Report {
            changed: files.iter().filter(|f| f.changed).count(),
            events: files.iter().map(|f| f.events.len()).sum(),
            errors: files.iter().filter(|f| f.error.is_some()).count(),
            files,
        }
    }

    pub fn to_json(&self) -> String {
        // Report holds only strings, paths and bools.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            let status = match (&file.error, file.changed) {
                (Some(_), _) => "error",
                (None, true) => "migrated",
                (None, false) => "unchanged",
            };
            out.push_str(&format!("{status}: {}\n", file.path.display()));
            for event in &file.events {
                out.push_str(&format!("  {}: {} ({})\n", event.message, event.snippet, event.declaring_type));
            }
        }
        out.push_str(&format!(
            "{} file(s), {} changed, {} event(s), {} error(s)\n",
            self.files.len(),
            self.changed,
            self.events,
            self.errors
        ));
        out
    }
}
