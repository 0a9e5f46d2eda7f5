// src/siteinfo/options.rs

use super::models::{LanguageOption, ThemeOption};

const THEMES: [(&str, &str); 3] = [("Default", "default"), ("Light", "light"), ("Dark", "dark")];

const LANGUAGES: [(&str, &str); 3] = [
    ("English", "en_US"),
    ("简体中文", "zh_CN"),
    ("Tiếng Việt", "vi_VN"),
];

pub fn theme_options() -> Vec<ThemeOption> {
    THEMES
        .iter()
        .map(|(label, value)| ThemeOption {
            label: label.to_string(),
            value: value.to_string(),
        })
        .collect()
}

pub fn language_options() -> Vec<LanguageOption> {
    LANGUAGES
        .iter()
        .map(|(label, value)| LanguageOption {
            label: label.to_string(),
            value: value.to_string(),
        })
        .collect()
}

pub fn is_theme_option(theme: &str) -> bool {
    THEMES.iter().any(|(_, value)| *value == theme)
}

pub fn is_language_option(language: &str) -> bool {
    LANGUAGES.iter().any(|(_, value)| *value == language)
}
