use std::path::Path;

use crate::adapters::exporters::csv_exporter::CsvExporter;
use crate::adapters::gateway::discord_rest::DiscordRest;
use crate::cli::{context, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::{Result, RollcallError};
use crate::core::services::crawler::Crawler;
use crate::core::services::report_builder::ReportBuilder;

/// Execute the `rollcall audit` command.
///
/// Connects to the platform, walks the complete history of every
/// readable channel in every community the bot belongs to, and writes
/// the per-member last-seen report as CSV.
pub fn execute(
    token_flag: Option<&str>,
    config_flag: Option<&str>,
    out_flag: Option<&str>,
    quiet: bool,
) -> Result<()> {
    let config = AppConfig::load(config_flag.map(Path::new))?;
    let token = context::resolve_token(token_flag, &config)?;
    let report_path = out_flag.unwrap_or(config.report.path.as_str());

    if !quiet {
        output::header("Rollcall activity audit");
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| RollcallError::ApiRequest {
            context: "creating the async runtime".into(),
            reason: e.to_string(),
        })?;

    rt.block_on(async {
        // 1. Connect and verify the token
        let sp = (!quiet).then(|| output::spinner("Connecting..."));
        let gateway =
            DiscordRest::connect(&config.rollcall.api_base, token, config.request_timeout())
                .await?;
        if let Some(sp) = sp {
            output::finish_spinner(sp, &format!("Connected as {}", gateway.bot_name()));
        }

        // 2. Crawl every readable channel, oldest history included
        if !quiet {
            println!("  Fetching all messages, this can take a while...");
        }
        let sp = (!quiet).then(|| output::spinner("Walking channel histories..."));
        let crawler = Crawler::new(&gateway, config.politeness());
        let outcome = crawler.run().await?;
        if let Some(sp) = sp {
            output::finish_spinner(
                sp,
                &format!(
                    "Walked {} channel(s), {} message(s) from {} member(s)",
                    outcome.channels_walked, outcome.messages_seen, outcome.members
                ),
            );
        }
        if !quiet && !outcome.skipped.is_empty() {
            output::warning(&format!(
                "{} channel(s) skipped without history access",
                outcome.skipped.len()
            ));
            for label in &outcome.skipped {
                output::detail(label);
            }
        }
        if !quiet && outcome.report.is_empty() {
            output::warning("No members found. Invite the bot to a community and rerun.");
        }

        // 3. Resolve member names
        let sp = (!quiet).then(|| output::spinner("Resolving member names..."));
        let built = ReportBuilder::new(&gateway).build(&outcome.report).await;
        if let Some(sp) = sp {
            output::finish_spinner(sp, &format!("{} member(s) in the report", built.rows.len()));
        }
        if !quiet && built.unresolved > 0 {
            output::warning(&format!(
                "{} name(s) could not be resolved",
                built.unresolved
            ));
        }

        // 4. Export
        let exporter = CsvExporter::new(report_path);
        exporter.export(&built.rows)?;
        if !quiet {
            output::success(&format!("Report written to {}", exporter.path().display()));
        }

        Ok(())
    })
}
