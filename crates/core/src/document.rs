use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Result, UiError};

pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Root element of the rendered UI.
pub trait Document: Send + Sync {
    fn set_attribute(&self, name: &str, value: &str) -> Result<()>;
}

/// Attribute map standing in for a rendered document.
#[derive(Debug, Default)]
pub struct HeadlessDocument {
    attributes: RwLock<HashMap<String, String>>,
}

impl HeadlessDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .read()
            .ok()
            .and_then(|attrs| attrs.get(name).cloned())
    }
}

impl Document for HeadlessDocument {
    fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        let mut attrs = self.attributes.write().map_err(|e| UiError::Document {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        attrs.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_attributes() {
        let doc = HeadlessDocument::new();
        assert_eq!(doc.attribute(THEME_ATTRIBUTE), None);
        doc.set_attribute(THEME_ATTRIBUTE, "pine").unwrap();
        doc.set_attribute(THEME_ATTRIBUTE, "rose").unwrap();
        assert_eq!(doc.attribute(THEME_ATTRIBUTE).as_deref(), Some("rose"));
    }
}
