//! The check-then-notify pass.
//!
//! Every catalog entry is checked in order, one request at a time. A failed
//! check is logged and the entry is left out of the in-stock set; it never
//! stops the pass. If anything is in stock, one notification is rendered
//! and handed to the dispatcher; otherwise nothing is sent.

use deckwatch_core::config::{AlertConfig, DEFAULT_BODY_TEMPLATE, DEFAULT_SUBJECT_TEMPLATE};
use deckwatch_core::{Config, Product};
use deckwatch_inventory::AvailabilityCheck;
use deckwatch_notify::templating::{TemplateContext, TemplateRenderer};
use deckwatch_notify::{DispatchResult, Dispatcher, Notification, NotifyError};
use tracing::{error, info, warn};

pub const IN_STOCK_LABEL: &str = "EN STOCK";
pub const OUT_OF_STOCK_LABEL: &str = "Sin stock";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// Outcome of checking a single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    InStock,
    OutOfStock,
    /// The check itself failed; the reason is the rendered error.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ItemReport {
    pub product: Product,
    pub status: ItemStatus,
}

/// What happened during one pass.
#[derive(Debug, Default)]
pub struct RunReport {
    pub timestamp: String,
    pub items: Vec<ItemReport>,
    /// Set when something was in stock and the alert rendered.
    pub notification: Option<Notification>,
    /// One entry per channel attempted. Empty on dry runs.
    pub deliveries: Vec<DispatchResult>,
}

impl RunReport {
    /// Names of the products found in stock, in catalog order.
    pub fn in_stock(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.status == ItemStatus::InStock)
            .map(|item| item.product.name.as_str())
            .collect()
    }

    pub fn failed_checks(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.status, ItemStatus::Failed(_)))
            .count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Render the alert but don't dispatch it.
    pub dry_run: bool,
}

/// Local wall-clock time in the format used in alerts, e.g.
/// `2026-10-19 12:46:25 +02:00`.
///
/// chrono has no zone abbreviations for `Local`, so the UTC offset stands
/// in for `CEST`-style names.
pub fn local_timestamp() -> String {
    chrono::Local::now()
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Run one full pass over `config.catalog`.
pub async fn run_once(
    config: &Config,
    checker: &dyn AvailabilityCheck,
    dispatcher: &Dispatcher,
    options: &RunOptions,
    timestamp: &str,
) -> RunReport {
    let mut report = RunReport {
        timestamp: timestamp.to_string(),
        ..Default::default()
    };

    for product in &config.catalog {
        let status = match checker.check(product.package_id, &config.country).await {
            Ok(true) => {
                info!(package_id = product.package_id, "{}: {}", product.name, IN_STOCK_LABEL);
                ItemStatus::InStock
            }
            Ok(false) => {
                info!(package_id = product.package_id, "{}: {}", product.name, OUT_OF_STOCK_LABEL);
                ItemStatus::OutOfStock
            }
            Err(e) => {
                error!(
                    package_id = product.package_id,
                    timeout = e.is_timeout(),
                    "Error consultando {}: {}", product, e
                );
                ItemStatus::Failed(e.to_string())
            }
        };
        report.items.push(ItemReport {
            product: product.clone(),
            status,
        });
    }

    let in_stock: Vec<String> = report.in_stock().iter().map(|s| s.to_string()).collect();
    if in_stock.is_empty() {
        info!("No hay stock en {}.", config.country);
        return report;
    }

    let ctx = TemplateContext {
        country: config.country.clone(),
        products: in_stock,
        store_url: config.store_url.clone(),
        now: timestamp.to_string(),
    };
    let notification = match render_alert(&config.alert, &ctx) {
        Ok(notification) => notification,
        Err(e) => {
            error!(error = %e, "could not render stock alert, nothing sent");
            return report;
        }
    };

    if options.dry_run {
        info!(subject = %notification.subject, "dry run, not sending:\n{}", notification.body);
    } else if dispatcher.is_empty() {
        warn!("products in stock but no notification channel is configured");
    } else {
        report.deliveries = dispatcher.dispatch(&notification).await;
        log_deliveries(&report.deliveries);
    }

    report.notification = Some(notification);
    report
}

/// Render with the configured templates, falling back to the built-in ones
/// if the configured pair doesn't render.
fn render_alert(alert: &AlertConfig, ctx: &TemplateContext) -> Result<Notification, NotifyError> {
    let renderer = TemplateRenderer::new();
    match renderer.render_notification(&alert.subject_template, &alert.body_template, ctx) {
        Ok(notification) => Ok(notification),
        Err(e) => {
            warn!(error = %e, "custom alert template failed, using built-in template");
            renderer.render_notification(DEFAULT_SUBJECT_TEMPLATE, DEFAULT_BODY_TEMPLATE, ctx)
        }
    }
}

pub fn log_deliveries(deliveries: &[DispatchResult]) {
    for delivery in deliveries {
        if delivery.success {
            info!(
                channel = %delivery.channel,
                duration_ms = delivery.duration_ms,
                "notification sent via {}", delivery.channel
            );
        } else {
            warn!(
                channel = %delivery.channel,
                duration_ms = delivery.duration_ms,
                "{} fallo: {}",
                delivery.channel,
                delivery.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}
