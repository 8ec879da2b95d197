use std::io::{self, IsTerminal};
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Crate targets whose level is raised by [`env_filter_with_level`].
pub const TARGET_PREFIXES: &[&str] = &[
    "ai_llm_service",
    "recipe_retrieval",
    "recipe_generator",
    "recipe_pipeline",
    "services",
    "api",
];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        let s = now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        w.write_str(&s)
    }
}

/// Build the formatting layer used by the recipe finder binary.
///
/// - RFC3339 UTC timestamps
/// - Compact single-line format
/// - `file:line` and target (module path)
/// - Span close events (duration at the end of instrumented calls)
/// - ANSI colors only when stdout is a terminal
pub fn layer<S>() -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let use_ansi = io::stdout().is_terminal();

    fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_level(true)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(use_ansi)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .event_format(fmt::format().compact().with_source_location(true))
}

/// Level directives for the workspace crates, e.g. `recipe_generator=debug`.
pub fn level_directives(level: Level) -> Vec<Directive> {
    TARGET_PREFIXES
        .iter()
        .filter_map(|t| Directive::from_str(&format!("{t}={}", level.as_str().to_lowercase())).ok())
        .collect()
}

/// Create an `EnvFilter` from `RUST_LOG` or `default`, then apply `level`
/// to the workspace crates.
///
/// Example: `default = "info"`, `level = Level::DEBUG` shows INFO globally
/// and DEBUG for the recipe finder crates. An explicit `RUST_LOG` wins.
pub fn env_filter_with_level(default: &str, level: Level) -> EnvFilter {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_directives(level)
            .into_iter()
            .fold(EnvFilter::new(default), |f, d| f.add_directive(d)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_every_crate() {
        let ds = level_directives(Level::DEBUG);
        assert_eq!(ds.len(), TARGET_PREFIXES.len());
        assert!(ds.iter().any(|d| d.to_string() == "recipe_generator=debug"));
    }
}
