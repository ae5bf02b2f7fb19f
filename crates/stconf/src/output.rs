//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use stconf_core::ApplyReport;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Presentation settings for one command, after flag and config fallback.
#[derive(Debug, Clone)]
pub struct RenderOpts {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: converts each item into an `R` row and builds a pretty table
/// - `json` / `json-compact` / `yaml`: serializes the original data via serde
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled + for<'a> From<&'a T>,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(R::from).collect();
            Ok(Table::new(rows).with(Style::rounded()).to_string())
        }
        OutputFormat::Plain => Ok(data.iter().map(id_fn).collect::<Vec<_>>().join("\n")),
        structured => render_structured(structured, data),
    }
}

/// Render the outcome of one apply.
///
/// Table mode prints a one-line status (`changed` or `ok`), plain mode
/// prints just the action.
pub fn render_report(
    format: &OutputFormat,
    report: &ApplyReport,
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(report_line(report, color)),
        OutputFormat::Plain => Ok(report.action.to_string()),
        structured => render_structured(structured, report),
    }
}

fn report_line(report: &ApplyReport, color: bool) -> String {
    let marker = match (report.changed, color) {
        (true, true) => "changed".yellow().bold().to_string(),
        (true, false) => "changed".into(),
        (false, true) => "ok".green().to_string(),
        (false, false) => "ok".into(),
    };
    let suffix = if report.dry_run && report.changed {
        " (dry run)"
    } else {
        ""
    };
    format!(
        "{marker}: {} {} {}{suffix}",
        report.kind, report.id, report.action
    )
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_structured<T: serde::Serialize + ?Sized>(
    format: &OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(render_err)?,
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(render_err)?,
        _ => serde_json::to_string_pretty(data).map_err(render_err)?,
    };
    Ok(rendered)
}

#[allow(clippy::needless_pass_by_value)]
fn render_err(err: impl std::error::Error) -> CliError {
    CliError::Render(err.to_string())
}
