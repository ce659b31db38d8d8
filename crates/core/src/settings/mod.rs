//! Typed settings backed by the flat key/value config table.
//!
//! Each setting names its key, the type it parses into and the default used
//! when the stored text is absent or malformed.

use std::str::FromStr;

use rust_decimal::Decimal;

/// A setting stored as text in the config table.
pub trait ConfigSetting {
    /// Key in the config table.
    const KEY: &'static str;

    /// Parsed value type.
    type Value: FromStr + Clone;

    /// Value used when nothing usable is stored.
    fn default_value() -> Self::Value;
}

/// Where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingSource {
    /// Parsed from the stored text.
    Stored,
    /// No row, or the row holds no text.
    Missing,
    /// Stored text could not be parsed.
    Malformed(String),
}

/// A resolved setting value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSetting<T> {
    /// Value to use.
    pub value: T,
    /// Where it came from.
    pub source: SettingSource,
}

/// Resolves raw stored text into a typed value, falling back to the default.
pub fn resolve_setting<S: ConfigSetting>(raw: Option<&str>) -> ResolvedSetting<S::Value> {
    match raw.map(str::trim).filter(|text| !text.is_empty()) {
        None => ResolvedSetting {
            value: S::default_value(),
            source: SettingSource::Missing,
        },
        Some(text) => match text.parse::<S::Value>() {
            Ok(value) => ResolvedSetting {
                value,
                source: SettingSource::Stored,
            },
            Err(_) => ResolvedSetting {
                value: S::default_value(),
                source: SettingSource::Malformed(text.to_string()),
            },
        },
    }
}

/// Recommended number of prospects per discipler.
#[derive(Debug, Clone, Copy)]
pub struct DisciplerProspectRatio;

impl ConfigSetting for DisciplerProspectRatio {
    const KEY: &'static str = "discipler_prospect_ratio";
    type Value = Decimal;

    fn default_value() -> Decimal {
        Decimal::ONE
    }
}
