//! Builds notifier channels from the run configuration.
//!
//! A channel whose credentials are incomplete is simply left out, so the
//! dispatcher never attempts it. A channel whose settings are present but
//! unusable (e.g. a malformed address) is logged and left out as well.

use deckwatch_core::config::{EmailConfig, TelegramConfig};
use deckwatch_core::Config;
use deckwatch_notify::email::{EmailNotifier, SmtpSettings};
use deckwatch_notify::telegram::TelegramNotifier;
use deckwatch_notify::Notifier;

/// Channels in dispatch order: Telegram first, then email.
pub fn build_channels(config: &Config) -> Vec<Box<dyn Notifier>> {
    let mut channels: Vec<Box<dyn Notifier>> = Vec::new();

    if let Some(telegram) = telegram_channel(&config.telegram) {
        channels.push(Box::new(telegram));
    }
    if let Some(email) = email_channel(&config.email) {
        channels.push(Box::new(email));
    }

    channels
}

fn telegram_channel(config: &TelegramConfig) -> Option<TelegramNotifier> {
    let (Some(token), Some(chat_id)) = (&config.bot_token, &config.chat_id) else {
        tracing::debug!("telegram channel not configured");
        return None;
    };

    match TelegramNotifier::from_config(
        token.clone(),
        chat_id.clone(),
        &config.api_base,
        config.timeout,
    ) {
        Ok(notifier) => Some(notifier),
        Err(e) => {
            tracing::warn!(error = %e, "telegram channel disabled");
            None
        }
    }
}

fn email_channel(config: &EmailConfig) -> Option<EmailNotifier> {
    let (Some(user), Some(password), Some(to)) =
        (&config.user, &config.app_password, &config.to)
    else {
        tracing::debug!("email channel not configured");
        return None;
    };

    let smtp = SmtpSettings {
        host: &config.smtp_host,
        port: config.smtp_port,
        username: user,
        password,
        timeout: config.timeout,
    };

    match EmailNotifier::from_config(smtp, to) {
        Ok(notifier) => Some(notifier),
        Err(e) => {
            tracing::warn!(error = %e, "email channel disabled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(&move |key: &str| vars.get(key).cloned())
    }

    fn names(channels: &[Box<dyn Notifier>]) -> Vec<&str> {
        channels.iter().map(|c| c.channel_name()).collect()
    }

    #[test]
    fn nothing_configured_means_no_channels() {
        let channels = build_channels(&config_from(&[]));
        assert!(channels.is_empty());
    }

    #[test]
    fn both_channels_in_fixed_order() {
        let config = config_from(&[
            ("TELEGRAM_BOT_TOKEN", "123:ABC"),
            ("TELEGRAM_CHAT_ID", "42"),
            ("GMAIL_USER", "me@example.com"),
            ("GMAIL_APP_PASSWORD", "app-pass"),
        ]);
        let channels = build_channels(&config);
        assert_eq!(names(&channels), vec!["telegram", "email"]);
    }

    #[test]
    fn email_only_when_chat_credentials_missing() {
        let config = config_from(&[
            ("TELEGRAM_BOT_TOKEN", "123:ABC"),
            ("GMAIL_USER", "me@example.com"),
            ("GMAIL_APP_PASSWORD", "app-pass"),
        ]);
        let channels = build_channels(&config);
        assert_eq!(names(&channels), vec!["email"]);
    }

    #[test]
    fn telegram_only_when_email_password_missing() {
        let config = config_from(&[
            ("TELEGRAM_BOT_TOKEN", "123:ABC"),
            ("TELEGRAM_CHAT_ID", "42"),
            ("GMAIL_USER", "me@example.com"),
        ]);
        let channels = build_channels(&config);
        assert_eq!(names(&channels), vec!["telegram"]);
    }

    #[test]
    fn malformed_address_drops_email_channel() {
        let config = config_from(&[
            ("GMAIL_USER", "not-an-address"),
            ("GMAIL_APP_PASSWORD", "app-pass"),
        ]);
        assert!(build_channels(&config).is_empty());
    }
}
