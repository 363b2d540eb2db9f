use crate::span::Span;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("Syntax error: {msg}")]
    Syntax { msg: String, span: Span },

    #[error("Resolve error: {msg}")]
    Resolve { msg: String, span: Span },

    /// A defect in the rule catalog (bad template code, binding arity mismatch).
    #[error("Template error: {msg}")]
    Template { msg: String },

    #[error("Config error: {msg}")]
    Config { msg: String, path: PathBuf },

    #[error("IO error: {msg}")]
    Io { msg: String, path: PathBuf },
}

impl MigrateError {
    pub fn syntax(msg: impl Into<String>, span: Span) -> Self {
        Self::Syntax { msg: msg.into(), span }
    }

    pub fn resolve(msg: impl Into<String>, span: Span) -> Self {
        Self::Resolve { msg: msg.into(), span }
    }

    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template { msg: msg.into() }
    }

    pub fn config(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Config { msg: msg.into(), path }
    }

    pub fn io(err: std::io::Error, path: PathBuf) -> Self {
        Self::Io { msg: err.to_string(), path }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            MigrateError::Syntax { span, .. } | MigrateError::Resolve { span, .. } => Some(*span),
            _ => None,
        }
    }
}

/// Render a MigrateError with ariadne for nice terminal output.
pub fn render_error(source: &str, filename: &str, err: &MigrateError) {
    use ariadne::{Label, Report, ReportKind, Source};

    match err {
        MigrateError::Syntax { msg, span } | MigrateError::Resolve { msg, span } => {
            let kind_str = match err {
                MigrateError::Syntax { .. } => "syntax",
                _ => "resolve",
            };
            let printed = Report::build(ReportKind::Error, (), span.start)
                .with_message(format!("{kind_str} error in {filename}"))
                .with_label(
                    Label::new(span.start..span.end)
                        .with_message(msg),
                )
                .finish()
                .eprint(Source::from(source));
            if printed.is_err() {
                eprintln!("error [{filename}]: {err}");
            }
        }
        MigrateError::Template { msg } => {
            eprintln!("error[catalog]: {msg}");
        }
        MigrateError::Config { msg, path } => {
            eprintln!("error[config]: {msg}");
            eprintln!("  --> {}", path.display());
        }
        MigrateError::Io { msg, path } => {
            eprintln!("error[io]: {msg}");
            eprintln!("  --> {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let err = MigrateError::syntax("expected ';'", Span::new(3, 4));
        assert_eq!(err.to_string(), "Syntax error: expected ';'");
        assert_eq!(err.span(), Some(Span::new(3, 4)));
    }

    #[test]
    fn template_errors_have_no_span() {
        let err = MigrateError::template("binding yields 2 expressions, template has 1 slot");
        assert!(err.span().is_none());
        assert!(err.to_string().starts_with("Template error"));
    }

    #[test]
    fn io_error_keeps_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        match MigrateError::io(io, PathBuf::from("A.java")) {
            MigrateError::Io { path, msg } => {
                assert_eq!(path, PathBuf::from("A.java"));
                assert_eq!(msg, "missing");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
