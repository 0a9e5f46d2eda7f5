// src/siteinfo/models.rs

use reqwest::Url;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const SITE_TYPE_GENERAL: &str = "general";
pub const SITE_TYPE_INTERFACE: &str = "interface";
pub const SITE_TYPE_SMTP: &str = "smtp";

/// One configuration section stored as JSON text
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteInfo {
    pub id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub site_type: String,
    pub content: String,
    pub status: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteGeneralReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub site_url: String,
    #[serde(default)]
    pub contact_email: String,
}

impl SiteGeneralReq {
    /// Reduces `site_url` to `scheme://host[:port]` plus its path without the trailing `/`.
    /// Unparseable URLs are left as they are.
    pub fn format_site_url(&mut self) {
        let Ok(parsed) = Url::parse(&self.site_url) else {
            return;
        };
        let Some(host) = parsed.host_str() else {
            return;
        };

        let mut formatted = format!("{}://{}", parsed.scheme(), host);
        if let Some(port) = parsed.port() {
            formatted.push_str(&format!(":{}", port));
        }
        formatted.push_str(parsed.path().trim_end_matches('/'));
        self.site_url = formatted;
    }
}

pub type SiteGeneralResp = SiteGeneralReq;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteInterfaceReq {
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub language: String,
}

pub type SiteInterfaceResp = SiteInterfaceReq;

/// Public site info: general and interface sections together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfoResp {
    pub general: Option<SiteGeneralResp>,
    pub interface: Option<SiteInterfaceResp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateSmtpConfigReq {
    #[serde(default)]
    pub from_email: String,
    #[serde(default)]
    pub from_name: String,
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default)]
    pub smtp_port: i64,
    #[serde(default)]
    pub encryption: String,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default)]
    pub smtp_authentication: bool,
    #[serde(default)]
    pub test_email_recipient: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetSmtpConfigResp {
    pub from_email: String,
    pub from_name: String,
    pub smtp_host: String,
    pub smtp_port: i64,
    pub encryption: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_authentication: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOption {
    pub label: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn general(url: &str) -> SiteGeneralReq {
        SiteGeneralReq {
            site_url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_format_site_url() {
        let cases = [
            ("https://example.com/", "https://example.com"),
            ("https://example.com/answer/", "https://example.com/answer"),
            ("http://localhost:9080/?q=1#top", "http://localhost:9080"),
            ("https://Example.COM/Path", "https://example.com/Path"),
        ];
        for (input, expected) in cases {
            let mut req = general(input);
            req.format_site_url();
            assert_eq!(req.site_url, expected, "input {}", input);
        }
    }

    #[test]
    fn test_format_site_url_keeps_unparseable_value() {
        let mut req = general("not a url");
        req.format_site_url();
        assert_eq!(req.site_url, "not a url");
    }
}
