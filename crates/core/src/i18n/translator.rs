use tokio::sync::watch;

use super::{InterpolationValues, Locale, LocaleCatalog};
use crate::store::Store;

/// Translation function bound to the active-locale store.
///
/// The locale is read at call time, so a consumer that re-reads after
/// [`Translator::changed`] never works with a stale locale.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: watch::Receiver<Locale>,
    catalog: &'static LocaleCatalog,
}

impl Translator {
    pub fn new(app_locale: &Store<Locale>) -> Self {
        Self::with_catalog(app_locale, LocaleCatalog::bundled())
    }

    pub fn with_catalog(app_locale: &Store<Locale>, catalog: &'static LocaleCatalog) -> Self {
        Self {
            locale: app_locale.subscribe(),
            catalog,
        }
    }

    pub fn locale(&self) -> Locale {
        *self.locale.borrow()
    }

    pub fn t(&self, text: &str) -> String {
        self.t_with(text, &InterpolationValues::new())
    }

    pub fn t_with(&self, text: &str, values: &InterpolationValues) -> String {
        self.catalog.translate(text, self.locale(), values)
    }

    /// Wait for the next locale change. Returns `false` once the store is gone.
    pub async fn changed(&mut self) -> bool {
        self.locale.changed().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn follows_locale_store() {
        let store = Store::new(Locale::En);
        let mut translator = Translator::new(&store);
        assert_eq!(translator.t("Settings"), "Settings");

        store.set(Locale::Jp);
        assert!(translator.changed().await);
        assert_eq!(translator.locale(), Locale::Jp);
        assert_eq!(translator.t("Settings"), "設定");
    }

    #[tokio::test]
    async fn changed_reports_dropped_store() {
        let store = Store::new(Locale::En);
        let mut translator = Translator::new(&store);
        drop(store);
        assert!(!translator.changed().await);
    }
}
