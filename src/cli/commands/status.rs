use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;

use crate::cli::{context, output};
use crate::config::app_config::{AppConfig, CONFIG_FILE};
use crate::core::errors::Result;

/// Execute the `rollcall status` command.
///
/// Offline overview of the tool's state: configuration in effect, token
/// presence, and the latest report. No network requests are made.
pub fn execute(config_flag: Option<&str>, token_flag: Option<&str>) -> Result<()> {
    let explicit = config_flag.map(Path::new);
    let config = AppConfig::load(explicit)?;

    output::header(&format!("Rollcall v{}", env!("CARGO_PKG_VERSION")));
    match explicit {
        Some(path) => println!("  Config: {}", path.display()),
        None if Path::new(CONFIG_FILE).exists() => println!("  Config: {CONFIG_FILE}"),
        None => println!("  Config: built-in defaults, {CONFIG_FILE} not found"),
    }
    println!("  API base: {}", config.rollcall.api_base.cyan());
    println!(
        "  Politeness: {}ms between page fetches",
        config.crawl.politeness_ms
    );

    print_token_state(token_flag, &config);
    print_report_state(&config);

    Ok(())
}

/// Print whether a token is available, never the token itself.
fn print_token_state(token_flag: Option<&str>, config: &AppConfig) {
    println!("\n{}", "  Token".bold());

    match context::resolve_token(token_flag, config) {
        Ok(_) => output::success("Bot token available"),
        Err(_) => output::warning(&format!(
            "No bot token. Export {} or pass --token.",
            config.rollcall.token_env
        )),
    }
}

/// Print the state of the report file the next audit would overwrite.
fn print_report_state(config: &AppConfig) {
    println!("\n{}", "  Report".bold());

    let path = Path::new(&config.report.path);
    if !path.exists() {
        output::warning(&format!(
            "No report at {} yet. Run 'rollcall audit' to create one.",
            path.display()
        ));
        return;
    }

    let content = std::fs::read_to_string(path).unwrap_or_default();
    output::success(&format!(
        "{} with {} member row(s)",
        path.display(),
        count_rows(&content)
    ));

    if let Ok(meta) = std::fs::metadata(path)
        && let Ok(modified) = meta.modified()
    {
        let at: DateTime<Utc> = modified.into();
        output::detail(&format!(
            "Last written {}",
            at.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }
}

/// Count data rows in a CSV report, excluding the header.
fn count_rows(content: &str) -> usize {
    content
        .lines()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .count()
}
