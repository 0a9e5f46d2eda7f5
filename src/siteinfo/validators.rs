// src/siteinfo/validators.rs

use std::sync::OnceLock;

use super::models::{SiteGeneralReq, SiteInterfaceReq, UpdateSmtpConfigReq};
use crate::common::validation::{Checker, ErrorField, FieldTag, Rule, RuleSet, Validate};
use crate::common::ApiError;
use crate::i18n::Translator;

impl Validate for SiteGeneralReq {
    fn rules() -> &'static RuleSet<Self> {
        static RULES: OnceLock<RuleSet<SiteGeneralReq>> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::<SiteGeneralReq>::new("SiteGeneralReq")
                .field(
                    FieldTag::new("name").json("name"),
                    &[Rule::Required, Rule::Min(2), Rule::Max(128)],
                    |r| (&r.name).into(),
                )
                .field(
                    FieldTag::new("short_description").json("short_description"),
                    &[Rule::Min(4), Rule::Max(255)],
                    |r| (&r.short_description).into(),
                )
                .field(
                    FieldTag::new("description").json("description"),
                    &[Rule::Min(4), Rule::Max(2000)],
                    |r| (&r.description).into(),
                )
                .field(
                    FieldTag::new("site_url").json("site_url"),
                    &[Rule::Required, Rule::Max(512), Rule::Url],
                    |r| (&r.site_url).into(),
                )
                .field(
                    FieldTag::new("contact_email").json("contact_email"),
                    &[Rule::Required, Rule::Max(512), Rule::Email],
                    |r| (&r.contact_email).into(),
                )
        })
    }
}

impl Validate for SiteInterfaceReq {
    fn rules() -> &'static RuleSet<Self> {
        static RULES: OnceLock<RuleSet<SiteInterfaceReq>> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::<SiteInterfaceReq>::new("SiteInterfaceReq")
                .field(
                    FieldTag::new("logo").json("logo"),
                    &[Rule::Max(256)],
                    |r| (&r.logo).into(),
                )
                .field(
                    FieldTag::new("theme").json("theme"),
                    &[Rule::Required, Rule::Max(128)],
                    |r| (&r.theme).into(),
                )
                .field(
                    FieldTag::new("language").json("language"),
                    &[Rule::Required, Rule::Max(128)],
                    |r| (&r.language).into(),
                )
        })
    }
}

impl Validate for UpdateSmtpConfigReq {
    fn rules() -> &'static RuleSet<Self> {
        static RULES: OnceLock<RuleSet<UpdateSmtpConfigReq>> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::<UpdateSmtpConfigReq>::new("UpdateSmtpConfigReq")
                .field(
                    FieldTag::new("from_email").json("from_email"),
                    &[Rule::Max(256), Rule::Email],
                    |r| (&r.from_email).into(),
                )
                .field(
                    FieldTag::new("from_name").json("from_name"),
                    &[Rule::Max(256)],
                    |r| (&r.from_name).into(),
                )
                .field(
                    FieldTag::new("smtp_host").json("smtp_host"),
                    &[Rule::Max(256)],
                    |r| (&r.smtp_host).into(),
                )
                .field(
                    FieldTag::new("smtp_port").json("smtp_port"),
                    &[Rule::Gte(0), Rule::Lte(65535)],
                    |r| r.smtp_port.into(),
                )
                .field(
                    FieldTag::new("encryption").json("encryption"),
                    &[Rule::OneOf(&["SSL", "TLS"])],
                    |r| (&r.encryption).into(),
                )
                .field(
                    FieldTag::new("smtp_username").json("smtp_username"),
                    &[Rule::Max(256)],
                    |r| (&r.smtp_username).into(),
                )
                .field(
                    FieldTag::new("smtp_password").json("smtp_password"),
                    &[Rule::Max(256)],
                    |r| (&r.smtp_password).into(),
                )
                .field(
                    FieldTag::new("test_email_recipient").json("test_email_recipient"),
                    &[Rule::Email],
                    |r| (&r.test_email_recipient).into(),
                )
        })
    }

    fn as_checker(&self) -> Option<&dyn Checker> {
        Some(self)
    }
}

impl Checker for UpdateSmtpConfigReq {
    /// A test email needs a sender, and authentication needs a username
    fn check(&self, translator: &Translator) -> Result<(), ApiError> {
        let missing = if self.smtp_authentication && self.smtp_username.is_empty() {
            Some("smtp_username")
        } else if !self.test_email_recipient.is_empty() && self.from_email.is_empty() {
            Some("from_email")
        } else {
            None
        };

        let Some(key) = missing else {
            return Ok(());
        };

        let message = translator
            .render("required", translator.field_label(key), "")
            .unwrap_or_else(|| format!("{} is a required field", key));

        Err(ApiError::ValidationError {
            message: message.clone(),
            field: Some(ErrorField {
                key: key.to_string(),
                value: message,
            }),
        })
    }
}
