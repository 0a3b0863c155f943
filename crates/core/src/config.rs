use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

pub const DEFAULT_COUNTRY: &str = "ES";
pub const DEFAULT_INVENTORY_API_URL: &str =
    "https://api.steampowered.com/IPhysicalGoodsService/CheckInventoryAvailableByPackage/v1/";
pub const DEFAULT_STORE_URL: &str =
    "https://store.steampowered.com/sale/steamdeckrefurbished/?l=spanish";
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;

const INVENTORY_TIMEOUT: Duration = Duration::from_secs(20);
const TELEGRAM_TIMEOUT: Duration = Duration::from_secs(15);
const SMTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Key lookups against some variable source, honouring the active profile.
///
/// With profile `PT`, `COUNTRY` is first read as `PT_COUNTRY` and falls back
/// to `COUNTRY`. Empty values count as unset.
struct Vars<'a> {
    profile: &'a str,
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl Vars<'_> {
    fn raw(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|s| !s.is_empty())
    }

    fn opt(&self, key: &str) -> Option<String> {
        if !self.profile.is_empty() {
            if let Some(v) = self.raw(&format!("{}_{}", self.profile, key)) {
                return Some(v);
            }
        }
        self.raw(key)
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.opt(key).unwrap_or_else(|| default.to_string())
    }

    fn u16(&self, key: &str, default: u16) -> u16 {
        self.opt(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

fn process_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

// ── Top-level config ──────────────────────────────────────────

/// Everything a single check run needs. Built once at startup and passed
/// by reference into the driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    /// ISO country code sent to the inventory API.
    pub country: String,
    /// Store page linked from notifications.
    pub store_url: String,
    pub catalog: Catalog,
    pub inventory: InventoryConfig,
    pub telegram: TelegramConfig,
    pub email: EmailConfig,
    pub alert: AlertConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `DECKWATCH_PROFILE`.
    pub fn from_env() -> Self {
        Self::from_lookup(&process_env)
    }

    /// Build config from an arbitrary key lookup. `from_env` is this over
    /// the process environment.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let profile = lookup("DECKWATCH_PROFILE")
            .unwrap_or_default()
            .to_uppercase();
        let vars = Vars {
            profile: &profile,
            lookup,
        };
        Self {
            country: vars.or("COUNTRY", DEFAULT_COUNTRY).to_uppercase(),
            store_url: vars.or("STORE_URL", DEFAULT_STORE_URL),
            catalog: Catalog::steam_deck_refurbished(),
            inventory: InventoryConfig::from_vars(&vars),
            telegram: TelegramConfig::from_vars(&vars),
            email: EmailConfig::from_vars(&vars),
            alert: AlertConfig::from_vars(&vars),
            profile,
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  country:     {}", self.country);
        tracing::info!("  catalog:     {} products", self.catalog.len());
        tracing::info!("  inventory:   url={}", self.inventory.api_url);
        tracing::info!(
            "  telegram:    {}",
            if self.telegram.is_configured() { "enabled" } else { "disabled" }
        );
        tracing::info!(
            "  email:       {} (smtp={}:{})",
            if self.email.is_configured() { "enabled" } else { "disabled" },
            self.email.smtp_host,
            self.email.smtp_port
        );
    }
}

// ── Inventory API ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    pub api_url: String,
    pub timeout: Duration,
}

impl InventoryConfig {
    fn from_vars(vars: &Vars<'_>) -> Self {
        Self {
            api_url: vars.or("INVENTORY_API_URL", DEFAULT_INVENTORY_API_URL),
            timeout: INVENTORY_TIMEOUT,
        }
    }
}

// ── Telegram ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub api_base: String,
    pub timeout: Duration,
}

impl TelegramConfig {
    fn from_vars(vars: &Vars<'_>) -> Self {
        Self {
            bot_token: vars.opt("TELEGRAM_BOT_TOKEN"),
            chat_id: vars.opt("TELEGRAM_CHAT_ID"),
            api_base: vars.or("TELEGRAM_API_BASE", DEFAULT_TELEGRAM_API_BASE),
            timeout: TELEGRAM_TIMEOUT,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

// ── Email (SMTP) ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Sender address, also the SMTP login.
    pub user: Option<String>,
    pub app_password: Option<String>,
    /// Recipient; defaults to the sender.
    pub to: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub timeout: Duration,
}

impl EmailConfig {
    fn from_vars(vars: &Vars<'_>) -> Self {
        let user = vars.opt("GMAIL_USER");
        Self {
            to: vars.opt("TO_EMAIL").or_else(|| user.clone()),
            user,
            app_password: vars.opt("GMAIL_APP_PASSWORD"),
            smtp_host: vars.or("SMTP_HOST", DEFAULT_SMTP_HOST),
            smtp_port: vars.u16("SMTP_PORT", DEFAULT_SMTP_PORT),
            timeout: SMTP_TIMEOUT,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.user.is_some() && self.app_password.is_some() && self.to.is_some()
    }
}

// ── Alert templates ───────────────────────────────────────────

pub const DEFAULT_SUBJECT_TEMPLATE: &str = "Steam Deck Refurb: ¡EN STOCK!";
pub const DEFAULT_BODY_TEMPLATE: &str = "🔥 Steam Deck (Refurb) DISPONIBLE en {{ country }}\n\
{% for name in products %}• {{ name }}\n{% endfor %}\
\nCompra: {{ store_url }}\n\
Hora: {{ now }}";

/// Minijinja templates used to render the stock notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    pub subject_template: String,
    pub body_template: String,
}

impl AlertConfig {
    fn from_vars(vars: &Vars<'_>) -> Self {
        Self {
            subject_template: vars.or("ALERT_SUBJECT_TEMPLATE", DEFAULT_SUBJECT_TEMPLATE),
            body_template: vars.or("ALERT_BODY_TEMPLATE", DEFAULT_BODY_TEMPLATE),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            subject_template: DEFAULT_SUBJECT_TEMPLATE.to_string(),
            body_template: DEFAULT_BODY_TEMPLATE.to_string(),
        }
    }
}
