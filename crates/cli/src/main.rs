use clap::Parser;
use tracing::{error, info, warn};

use deckwatch_cli::channels::build_channels;
use deckwatch_cli::cli::CliArgs;
use deckwatch_cli::run::{local_timestamp, log_deliveries, run_once, RunOptions};
use deckwatch_core::config::{self, AlertConfig};
use deckwatch_core::Config;
use deckwatch_inventory::SteamInventoryClient;
use deckwatch_notify::templating::TemplateRenderer;
use deckwatch_notify::Dispatcher;

fn load_config(args: &CliArgs) -> Config {
    config::load_dotenv();
    let mut config = Config::from_env();
    if let Some(country) = &args.country {
        config.country = country.to_uppercase();
    }
    check_templates(&mut config.alert);
    config
}

/// Swap out custom templates that don't parse so a typo in the environment
/// can't silence the alert.
fn check_templates(alert: &mut AlertConfig) {
    let renderer = TemplateRenderer::new();
    let defaults = AlertConfig::default();

    if let Err(e) = renderer.validate(&alert.subject_template) {
        warn!(error = %e, "invalid ALERT_SUBJECT_TEMPLATE, using built-in subject");
        alert.subject_template = defaults.subject_template;
    }
    if let Err(e) = renderer.validate(&alert.body_template) {
        warn!(error = %e, "invalid ALERT_BODY_TEMPLATE, using built-in body");
        alert.body_template = defaults.body_template;
    }
}

// Every failure past argument parsing is logged; the process still exits 0
// so the scheduler doesn't treat a flaky vendor API as a broken job.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = load_config(&args);
    config.log_summary();

    let dispatcher = Dispatcher::new(build_channels(&config));
    info!(channels = ?dispatcher.channel_names(), "notification channels ready");

    if args.test_notify {
        if dispatcher.is_empty() {
            warn!("--test-notify: no notification channel is configured");
        }
        let results = dispatcher.test_all().await;
        log_deliveries(&results);
        return Ok(());
    }

    let checker = match SteamInventoryClient::new(&config.inventory) {
        Ok(checker) => checker,
        Err(e) => {
            error!(error = %e, "could not build inventory HTTP client");
            return Ok(());
        }
    };

    let options = RunOptions {
        dry_run: args.dry_run,
    };
    let report = run_once(&config, &checker, &dispatcher, &options, &local_timestamp()).await;

    info!(
        checked = report.items.len(),
        in_stock = report.in_stock().len(),
        failed = report.failed_checks(),
        notified = report.deliveries.iter().filter(|d| d.success).count(),
        "check finished"
    );

    Ok(())
}
