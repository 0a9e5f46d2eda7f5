// src/i18n/mod.rs
//! Embedded message catalogs used to localize validation errors.
//!
//! Two locales ship with the binary (`en_US` and `zh_CN`). Each catalog holds
//! rule message templates (`{0}` is the field label, `{1}` the rule parameter)
//! and optional display labels for wire field names.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

const EN_US_CATALOG: &str = include_str!("locales/en_US.json");
const ZH_CN_CATALOG: &str = include_str!("locales/zh_CN.json");

/// Languages with a validation message catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Chinese,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Chinese];

    /// Locale identifier used on the wire and in stored settings
    pub fn abbr(&self) -> &'static str {
        match self {
            Language::English => "en_US",
            Language::Chinese => "zh_CN",
        }
    }

    /// Parses a locale tag or an `Accept-Language` header value.
    ///
    /// Accepts `zh_CN`, `zh-CN`, `zh`, `en-US,en;q=0.9` and similar; only the
    /// first entry of a list is considered.
    pub fn parse(raw: &str) -> Option<Language> {
        let first = raw.split(',').next()?.split(';').next()?;
        let tag = first.trim().replace('-', "_").to_ascii_lowercase();

        if tag.is_empty() {
            return None;
        }
        if tag == "zh" || tag.starts_with("zh_") {
            return Some(Language::Chinese);
        }
        if tag == "en" || tag.starts_with("en_") {
            return Some(Language::English);
        }
        None
    }

    fn raw_catalog(&self) -> &'static str {
        match self {
            Language::English => EN_US_CATALOG,
            Language::Chinese => ZH_CN_CATALOG,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbr())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid message catalog for {lang}: {source}")]
    Parse {
        lang: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    validation: HashMap<String, String>,
    #[serde(default)]
    fields: HashMap<String, String>,
}

/// Renders rule violations for one language
#[derive(Debug, Clone)]
pub struct Translator {
    language: Language,
    templates: HashMap<String, String>,
    labels: HashMap<String, String>,
}

impl Translator {
    /// Builds the translator from the catalog embedded for `language`
    pub fn builtin(language: Language) -> Result<Self, CatalogError> {
        Self::from_json(language, language.raw_catalog())
    }

    pub fn from_json(language: Language, raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_json::from_str(raw).map_err(|source| CatalogError::Parse {
                lang: language.abbr(),
                source,
            })?;

        Ok(Self {
            language,
            templates: file.validation,
            labels: file.fields,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Display label for a wire field name; unknown names are shown as-is
    pub fn field_label<'a>(&'a self, wire_name: &'a str) -> &'a str {
        self.labels
            .get(wire_name)
            .map(String::as_str)
            .unwrap_or(wire_name)
    }

    /// Renders the message for rule `tag`, or `None` when the catalog has no template
    pub fn render(&self, tag: &str, field: &str, param: &str) -> Option<String> {
        self.templates
            .get(tag)
            .map(|template| template.replace("{0}", field).replace("{1}", param))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_tags() {
        assert_eq!(Language::parse("zh_CN"), Some(Language::Chinese));
        assert_eq!(Language::parse("zh-CN"), Some(Language::Chinese));
        assert_eq!(Language::parse("zh"), Some(Language::Chinese));
        assert_eq!(Language::parse("en-US,en;q=0.9"), Some(Language::English));
        assert_eq!(Language::parse(" en_GB "), Some(Language::English));
        assert_eq!(Language::parse("fr_FR"), None);
        assert_eq!(Language::parse(""), None);
    }

    #[test]
    fn test_builtin_catalogs_load() {
        for language in Language::ALL {
            let translator = Translator::builtin(language).unwrap();
            assert_eq!(translator.language(), language);
            assert!(translator.render("required", "name", "").is_some());
        }
    }

    #[test]
    fn test_render_substitutes_field_and_param() {
        let translator = Translator::builtin(Language::English).unwrap();
        let message = translator.render("max", "name", "30").unwrap();
        assert_eq!(message, "name must be a maximum of 30 characters in length");
    }

    #[test]
    fn test_field_labels_fall_back_to_wire_name() {
        let zh = Translator::builtin(Language::Chinese).unwrap();
        assert_eq!(zh.field_label("site_url"), "站点地址");
        assert_eq!(zh.field_label("unknown_field"), "unknown_field");

        let en = Translator::builtin(Language::English).unwrap();
        assert_eq!(en.field_label("site_url"), "site_url");
    }

    #[test]
    fn test_invalid_catalog_is_reported() {
        let result = Translator::from_json(Language::English, "{ not json");
        assert!(matches!(result, Err(CatalogError::Parse { lang: "en_US", .. })));
    }
}
