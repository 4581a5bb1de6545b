//! Attribute bag handed from the XML layer to node constructors.

use std::collections::HashMap;

use tracing::warn;

use crate::color::{parse_color, Color};

/// Named attribute values of one element, plus its text content.
#[derive(Debug, Clone, Default)]
pub struct AttributeBag {
    values: HashMap<String, String>,
    text: String,
}

impl AttributeBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the attributes and text of an XML element.
    pub fn from_element(node: roxmltree::Node<'_, '_>) -> Self {
        let values = node
            .attributes()
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect();
        let text = node
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect::<String>();
        Self { values, text }
    }

    /// Builder-style insert, mostly for constructing nodes by hand.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Element text, trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// String attribute, or `default` when absent.
    pub fn string(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or(default).to_string()
    }

    /// Numeric attribute, or `default` when absent or unparseable.
    pub fn float(&self, name: &str, default: f32) -> f32 {
        let Some(raw) = self.get(name) else {
            return default;
        };
        match raw.trim().parse::<f32>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                warn!(attribute = name, value = raw, "Invalid number, using default");
                default
            }
        }
    }

    /// Color attribute, or `default` when absent or unparseable.
    pub fn color(&self, name: &str, default: Color) -> Color {
        let Some(raw) = self.get(name) else {
            return default;
        };
        parse_color(raw).unwrap_or_else(|| {
            warn!(attribute = name, value = raw, "Unsupported color, using default");
            default
        })
    }
}
