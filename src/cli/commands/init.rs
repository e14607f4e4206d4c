use std::path::Path;

use crate::cli::output;
use crate::config::app_config::CONFIG_FILE;
use crate::core::errors::{Result, RollcallError};

/// Execute the `rollcall init` command.
///
/// Writes a commented starter configuration in the current directory.
pub fn execute(verbose: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_FILE);

    if config_path.exists() {
        return Err(RollcallError::InvalidConfig {
            detail: format!("{CONFIG_FILE} already exists in this directory"),
        });
    }

    output::header("Rollcall setup");

    let config_content = r#"[rollcall]
# Base URL of the chat platform's REST API.
api_base = "https://discord.com/api/v10"
# Environment variable read when --token is not given.
token_env = "DISCORD_TOKEN"

[crawl]
# Pause between history page fetches, in milliseconds.
politeness_ms = 200
# Per-request HTTP timeout, in seconds.
request_timeout_secs = 30

[report]
# Where 'rollcall audit' writes the CSV report.
path = "last-seen.csv"
"#;
    std::fs::write(config_path, config_content)?;
    output::success(&format!("Generated {CONFIG_FILE} with defaults"));

    print_next_steps(verbose);

    Ok(())
}

/// Print next steps after init.
fn print_next_steps(verbose: bool) {
    println!("\n  Next steps:");
    println!("     1. Invite your bot to the communities you want audited");
    println!("     2. Export DISCORD_TOKEN with the bot token");
    println!("     3. Run 'rollcall audit' to generate the report");

    if verbose {
        println!();
        println!("  The report lists every current member with the UTC time of");
        println!("  their most recent message, or N/A if none was found.");
    }
}
