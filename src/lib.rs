use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};

pub mod admission;
pub mod collate;
pub mod config;
pub mod drag;
pub mod engine;
pub mod item;
pub mod mode;
pub mod preview;
pub mod render;
pub mod scan;
pub mod session;
pub mod snapshot;
pub mod store;

pub use item::{Candidate, Item, ItemId};
pub use mode::{Mode, SortKey};
pub use session::{Command, Session, Stage};
pub use store::{Ignored, Outcome, SequenceStore};

pub type SessionLogHook = Arc<Mutex<dyn Fn(&str) + Send + Sync + 'static>>;

static LOG_HOOK: Lazy<Mutex<Option<SessionLogHook>>> = Lazy::new(|| Mutex::new(None));

pub fn set_log_hook(hook: Option<SessionLogHook>) {
    if let Ok(mut guard) = LOG_HOOK.lock() {
        *guard = hook;
    }
}

pub(crate) fn logv(tag: &str, message: &str) {
    match tag {
        "WARN" => tracing::warn!("{}", message),
        _ => tracing::info!("{}", message),
    }

    if let Ok(guard) = LOG_HOOK.lock() {
        if let Some(hook) = guard.as_ref() {
            if let Ok(callback) = hook.lock() {
                let line = format!("[{}] {}", tag, message);
                callback(&line);
            }
        }
    }
}

pub(crate) fn logi(message: impl AsRef<str>) {
    logv("INFO", message.as_ref());
}

pub(crate) fn logok(message: impl AsRef<str>) {
    logv("OK", message.as_ref());
}

pub(crate) fn logw(message: impl AsRef<str>) {
    logv("WARN", message.as_ref());
}
