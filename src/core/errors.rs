use std::path::PathBuf;

/// All domain errors for Rollcall.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger.
#[derive(Debug, thiserror::Error)]
pub enum RollcallError {
    #[error(
        "A crawl is already running\n\n  \
         Only one history crawl can be active at a time, and requests are\n  \
         rejected rather than queued.\n\n  \
         Solutions:\n    \
         → Wait for the active crawl to finish, then run 'rollcall audit' again\n    \
         → Large communities can take several minutes to walk"
    )]
    CrawlInProgress,

    #[error(
        "No bot token configured\n\n  \
         Rollcall needs a Discord bot token to call the API.\n\n  \
         Solutions:\n    \
         → Export it: export {env_var}=<your-bot-token>\n    \
         → Or pass it directly: rollcall audit --token <your-bot-token>\n    \
         → The variable name can be changed in rollcall.toml ([rollcall] token_env)"
    )]
    MissingToken { env_var: String },

    #[error(
        "Discord API request failed while {context}: {reason}\n\n  \
         The crawl was aborted and no report was written.\n  \
         Check your network connection and try again."
    )]
    ApiRequest { context: String, reason: String },

    #[error(
        "Discord API returned status {status} while {context}\n\n  \
         {detail}\n\n  \
         Solutions:\n    \
         → 401: the token is invalid or was revoked. Generate a new one\n    \
         → 403: the bot is missing access. Check its roles and invite scopes\n    \
         → 5xx: Discord-side trouble. Try again in a few minutes"
    )]
    ApiStatus {
        context: String,
        status: u16,
        detail: String,
    },

    #[error(
        "Unexpected payload while {context}: {reason}\n\n  \
         Discord sent a response this version of Rollcall cannot read.\n  \
         If this persists, the API may have changed; check for an update."
    )]
    InvalidPayload { context: String, reason: String },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(
        "Could not write report to {path}: {reason}\n\n  \
         Solutions:\n    \
         → Check that the directory is writable\n    \
         → Pick another destination: rollcall audit --out <path>"
    )]
    ReportWrite { path: PathBuf, reason: String },

    #[error(
        "'{input}' is not a valid snowflake ID\n\n  \
         Expected a decimal number, e.g. 175928847299117063.\n  \
         Right-click a message or user in Discord and choose 'Copy ID'."
    )]
    InvalidSnowflake { input: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RollcallError>;
