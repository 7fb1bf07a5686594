//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger initialisation
//! - Score storage backend selection
//! - The wasm-bindgen surface the page script drives

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Install the logger for this target. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already initialised");
    }
}

/// Install the logger for this target. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Default score store for this target
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> crate::persistence::LocalStorageStore {
    crate::persistence::LocalStorageStore::new()
}

/// Default score store for this target: `./scores/<key>.json`
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> crate::persistence::FileStore {
    crate::persistence::FileStore::new("scores")
}
