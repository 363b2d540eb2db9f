use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use chronoport::batch::{self, Report};
use chronoport::config::{self, Config, ReportFormat};
use chronoport::diagnostics::{render_error, MigrateError};
use chronoport::migrate::catalog::RuleAction;
use chronoport::migrate::Engine;

#[derive(Parser)]
#[command(name = "chronoport", version, about = "Migrate Joda-Time usages to java.time")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate Java source files or directories
    Migrate {
        /// Files or directories to migrate
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Write migrated sources back in place
        #[arg(long)]
        write: bool,
        /// Exit non-zero when any file would change
        #[arg(long)]
        check: bool,
        /// Report format (overrides chronoport.toml)
        #[arg(long, value_enum)]
        report: Option<ReportArg>,
        /// Number of worker threads (defaults to available parallelism)
        #[arg(short, long)]
        jobs: Option<usize>,
        /// Path to chronoport.toml (defaults to discovery from the current dir)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the rule catalog
    Catalog {
        /// Only list this structural family
        #[arg(long)]
        family: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportArg {
    Text,
    Json,
}

impl From<ReportArg> for ReportFormat {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Text => ReportFormat::Text,
            ReportArg::Json => ReportFormat::Json,
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(err: &MigrateError, filename: &str, source: &str) -> ! {
    render_error(source, filename, err);
    std::process::exit(1);
}

fn load_config(explicit: Option<&PathBuf>) -> Result<Config, MigrateError> {
    match explicit {
        Some(path) => config::load(path),
        None => {
            let cwd = std::env::current_dir().map_err(|e| MigrateError::io(e, PathBuf::from(".")))?;
            config::discover(&cwd)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Migrate { paths, write, check, report, jobs, config } => {
            let cfg = match load_config(config.as_ref()) {
                Ok(cfg) => cfg,
                Err(err) => fail(&err, "chronoport.toml", ""),
            };
            let engine = match Engine::from_config(&cfg.migrate) {
                Ok(engine) => engine,
                Err(err) => fail(&err, "chronoport.toml", ""),
            };
            let files = match batch::collect_sources(&paths) {
                Ok(files) => files,
                Err(err) => fail(&err, "", ""),
            };
            let jobs = jobs
                .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
                .unwrap_or(1);

            let outcomes = batch::migrate_files(&engine, files, jobs);

            let mut failed = false;
            for outcome in &outcomes {
                match &outcome.result {
                    Err(err) => {
                        render_error(&outcome.source, &outcome.path.display().to_string(), err);
                        failed = true;
                    }
                    Ok(migrated) if write && outcome.changed() => {
                        if let Err(e) = std::fs::write(&outcome.path, &migrated.output) {
                            render_error("", "", &MigrateError::io(e, outcome.path.clone()));
                            failed = true;
                        }
                    }
                    Ok(migrated) if !write && !check && outcome.changed() => {
                        println!("// ---- {} ----", outcome.path.display());
                        print!("{}", migrated.output);
                    }
                    Ok(_) => {}
                }
            }

            let summary = Report::from_outcomes(&outcomes);
            match report.map(ReportFormat::from).unwrap_or(cfg.report.format) {
                ReportFormat::Json => println!("{}", summary.to_json()),
                ReportFormat::Text => eprint!("{}", summary.to_text()),
            }

            if failed {
                std::process::exit(1);
            }
            if check && summary.changed > 0 {
                std::process::exit(2);
            }
            if cfg.report.fail_on_unmapped && summary.events > 0 {
                std::process::exit(3);
            }
        }
        Commands::Catalog { family } => {
            let engine = match Engine::joda() {
                Ok(engine) => engine,
                Err(err) => fail(&err, "catalog", ""),
            };
            let catalog = engine.catalog();
            if let Some(name) = &family {
                if catalog.family(name).is_none() {
                    eprintln!("error: unknown family '{name}'");
                    std::process::exit(1);
                }
            }
            for fam in catalog.families() {
                if family.as_ref().is_some_and(|f| f != &fam.name) {
                    continue;
                }
                println!("family {} (preconditions: {})", fam.name, fam.preconditions.join(", "));
                for group in catalog.groups().iter().filter(|g| fam.owns(&g.legacy)) {
                    println!("  {}", group.legacy);
                    for rule in &group.rules {
                        let action = match &rule.action {
                            RuleAction::Rewrite(template, _) => template.code().to_string(),
                            RuleAction::Retain => "(retained)".to_string(),
                            RuleAction::Ambiguous => "(ambiguous)".to_string(),
                            RuleAction::Unsupported => "(unsupported)".to_string(),
                        };
                        println!("    {} -> {action}", rule.pattern);
                    }
                    for fusion in &group.fusions {
                        println!("    {} . {} -> {}", fusion.inner, fusion.outer, fusion.template.code());
                    }
                    for field in &group.fields {
                        println!("    {} -> {}.{}", field.pattern, field.target, field.name);
                    }
                }
            }
            if family.is_none() {
                println!("renames");
                for rename in catalog.renames() {
                    println!("  {} -> {}", rename.pattern, rename.new_name);
                }
            }
        }
    }
}
