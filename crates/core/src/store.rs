//! Process-wide reactive state.
//!
//! Every store is created once at start-up with a defined initial value and
//! has exactly one mutation entry point, [`Store::set`], which replaces the
//! value wholesale. Readers either take a snapshot with [`Store::get`] or keep
//! a [`watch::Receiver`] and re-read after `changed()`.

use tokio::sync::watch;

use crate::i18n::Locale;
use crate::profile::ProfileProps;
use crate::settings::AppSettings;

#[derive(Debug)]
pub struct Store<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Store<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Replace the value. Concurrent writers are not ordered: last write wins.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + Default> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// All UI stores of one running application.
#[derive(Debug, Default)]
pub struct AppStores {
    pub app_settings: Store<Option<AppSettings>>,
    pub app_locale: Store<Locale>,
    pub debug_log_level_overwrite: Store<bool>,
    pub poll_running_game: Store<bool>,
    pub profiles: Store<ProfileProps>,
}

impl AppStores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable_polling(&self) {
        self.poll_running_game.set(true);
    }

    pub fn disable_polling(&self) {
        self.poll_running_game.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_values() {
        let stores = AppStores::new();
        assert!(stores.app_settings.get().is_none());
        assert_eq!(stores.app_locale.get(), Locale::En);
        assert!(!stores.debug_log_level_overwrite.get());
        assert!(stores.profiles.get().states.is_empty());
    }

    #[test]
    fn last_write_wins() {
        let store = Store::new(0u32);
        store.set(1);
        store.set(2);
        assert_eq!(store.get(), 2);
    }

    #[tokio::test]
    async fn subscribers_observe_replacement() {
        let store = Store::new(false);
        let mut rx = store.subscribe();
        store.set(true);
        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }

    #[test]
    fn polling_toggles() {
        let stores = AppStores::new();
        stores.enable_polling();
        assert!(stores.poll_running_game.get());
        stores.disable_polling();
        assert!(!stores.poll_running_game.get());
    }
}
