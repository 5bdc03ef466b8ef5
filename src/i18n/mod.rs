//! Translation catalog.
//!
//! Locales ship embedded in the binary and load lazily through the
//! application context. Lookups never fail: a missing key renders as the
//! key itself, which keeps a hole in a catalog cosmetic instead of fatal.

use std::collections::HashMap;
use tracing::debug;

const EN: &str = include_str!("locales/en.json");
const FR: &str = include_str!("locales/fr.json");

pub struct Catalog {
    locale: String,
    entries: HashMap<String, String>,
}

impl Catalog {
    /// Loads the catalog for a locale, falling back to English for
    /// unknown locales or malformed catalogs.
    pub fn load(locale: &str) -> Self {
        let (locale, raw) = match locale {
            "fr" => ("fr", FR),
            "en" => ("en", EN),
            other => {
                debug!("Unknown locale {other}, falling back to en");
                ("en", EN)
            }
        };

        let entries = serde_json::from_str(raw).unwrap_or_else(|e| {
            debug!("Catalog for {locale} is malformed: {e}");
            HashMap::new()
        });

        Catalog {
            locale: locale.to_string(),
            entries,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries.get(key).map(String::as_str).unwrap_or(key)
    }
}
