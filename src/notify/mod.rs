//! Best-effort notification side-channel to a Telegram-style bot API.
//!
//! Delivery is fire-and-forget: a failed send is reported on the error
//! channel and swallowed, never retried, never surfaced to the caller. The
//! destination (token, chat, API base) is injected via configuration; with
//! no destination installed, [`notify`] is a local no-op.

use arc_swap::ArcSwapOption;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::schema::NotifierConfig;
use crate::format;

struct Notifier {
    client: reqwest::Client,
    token: String,
    chat_id: i64,
    api_url: String,
}

static ACTIVE: ArcSwapOption<Notifier> = ArcSwapOption::const_empty();

/// Install (or clear) the notifier destination from configuration.
///
/// A disabled config clears the destination. A client that fails to build is
/// reported on the error channel and the destination stays cleared, which
/// degrades [`notify`] to a no-op rather than an error source.
pub fn configure(config: &NotifierConfig) {
    if !config.enabled {
        ACTIVE.store(None);
        return;
    }
    match reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
    {
        Ok(client) => ACTIVE.store(Some(Arc::new(Notifier {
            client,
            token: config.bot_token.clone(),
            chat_id: config.chat_id,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }))),
        Err(error) => {
            crate::err!("notifier init failed: {error}");
            ACTIVE.store(None);
        }
    }
}

/// Render a message and forward it to the configured chat.
///
/// The message is rendered eagerly, so the returned future is `Send` and
/// carries no borrow of the arguments. Prefer the
/// [`notify!`](crate::notify) macro.
pub fn notify(args: fmt::Arguments<'_>) -> impl Future<Output = ()> + Send + 'static {
    let text = format::plain(args);
    async move {
        let Some(notifier) = ACTIVE.load_full() else {
            return;
        };
        notifier.send(text).await;
    }
}

impl Notifier {
    async fn send(&self, text: String) {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);
        let payload = serde_json::json!({ "chat_id": self.chat_id, "text": text });
        match self.client.post(&url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => crate::err!("notifier delivery rejected: {}", response.status()),
            // The token is part of the URL; strip it before the error
            // reaches a sink.
            Err(error) => crate::err!("notifier delivery failed: {}", error.without_url()),
        }
    }
}

/// Format a message and forward it to the configured chat, fire-and-forget.
/// Expands to a future; `.await` it (failures are still swallowed).
#[macro_export]
macro_rules! notify {
    ($($arg:tt)*) => { $crate::notify::notify(::core::format_args!($($arg)*)) };
}
