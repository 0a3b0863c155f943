use clap::Parser;

/// Check refurbished Steam Deck stock once and notify when something is available.
///
/// Meant to be run from a scheduler (cron, CI). Credentials come from the
/// environment or a `.env` file; see `deckwatch_core::Config`.
#[derive(Parser, Debug)]
#[command(name = "deckwatch", version, about)]
pub struct CliArgs {
    /// Country code to check (overrides the configured one)
    #[arg(long)]
    pub country: Option<String>,

    /// Check and render the alert, but don't send it
    #[arg(long)]
    pub dry_run: bool,

    /// Send a test notification through every configured channel and exit
    #[arg(long)]
    pub test_notify: bool,
}
