use chrono::SecondsFormat;

use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::snowflake::Snowflake;

/// Execute the `rollcall decode` command.
///
/// Prints the creation moment embedded in a platform ID.
pub fn execute(id: &str) -> Result<()> {
    let flake: Snowflake = id.trim().parse()?;

    output::header(&format!("ID {flake}"));
    println!(
        "  Created: {}",
        flake
            .timestamp()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    println!("  Unix ms: {}", flake.timestamp_millis());

    Ok(())
}
