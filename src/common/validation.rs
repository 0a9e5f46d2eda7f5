// src/common/validation.rs
//! Declarative request validation
//!
//! Request types describe their fields once, in a static [`RuleSet`]: a field
//! tag table (Rust name, json name, form name) plus the ordered rules for each
//! field. [`RequestValidator::check`] runs the rules, stops at the first
//! violation and reports it as a single localized [`ErrorField`].

use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, error};

use super::error::ApiError;
use crate::i18n::{CatalogError, Language, Translator};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// First validation failure of a request: wire key and localized message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorField {
    pub key: String,
    pub value: String,
}

/// Names a field is known by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldTag {
    pub name: &'static str,
    pub json: Option<&'static str>,
    pub form: Option<&'static str>,
}

impl FieldTag {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            json: None,
            form: None,
        }
    }

    pub const fn json(self, json: &'static str) -> Self {
        Self {
            json: Some(json),
            ..self
        }
    }

    pub const fn form(self, form: &'static str) -> Self {
        Self {
            form: Some(form),
            ..self
        }
    }

    /// json name, then form name, then the Rust field name. A json name of
    /// `-` hides the field and resolves to an empty name.
    pub fn wire_name(&self) -> &'static str {
        match self.json {
            Some("-") => "",
            Some(json) if !json.is_empty() => json,
            _ => match self.form {
                Some(form) if !form.is_empty() => form,
                _ => self.name,
            },
        }
    }

    /// The explicitly declared json or form name, without falling back to the Rust name
    pub fn declared_name(&self) -> Option<&'static str> {
        match self.json {
            Some(json) if !json.is_empty() && json != "-" => Some(json),
            _ => self.form.filter(|form| !form.is_empty()),
        }
    }
}

/// A single declarative constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    /// Minimum length in characters
    Min(usize),
    /// Maximum length in characters
    Max(usize),
    Email,
    Url,
    OneOf(&'static [&'static str]),
    Gte(i64),
    Lte(i64),
}

impl Rule {
    /// Catalog key of the rule's message template
    pub fn tag(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::Email => "email",
            Rule::Url => "url",
            Rule::OneOf(_) => "oneof",
            Rule::Gte(_) => "gte",
            Rule::Lte(_) => "lte",
        }
    }

    pub fn param(&self) -> String {
        match self {
            Rule::Required | Rule::Email | Rule::Url => String::new(),
            Rule::Min(n) | Rule::Max(n) => n.to_string(),
            Rule::OneOf(options) => options.join(" "),
            Rule::Gte(n) | Rule::Lte(n) => n.to_string(),
        }
    }

    /// Whether `value` satisfies the rule. Every rule except `Required` accepts
    /// absent or empty values.
    pub fn accepts(&self, value: FieldValue<'_>) -> bool {
        if let Rule::Required = self {
            return value.is_present();
        }
        if !value.is_present() {
            return true;
        }

        match (self, value) {
            (Rule::Min(n), FieldValue::Text(Some(s))) => s.chars().count() >= *n,
            (Rule::Max(n), FieldValue::Text(Some(s))) => s.chars().count() <= *n,
            (Rule::Min(n), FieldValue::Number(Some(v))) => v >= *n as i64,
            (Rule::Max(n), FieldValue::Number(Some(v))) => v <= *n as i64,
            (Rule::Email, FieldValue::Text(Some(s))) => is_email(s),
            (Rule::Url, FieldValue::Text(Some(s))) => Url::parse(s).is_ok(),
            (Rule::OneOf(options), FieldValue::Text(Some(s))) => {
                options.iter().any(|option| *option == s)
            }
            (Rule::OneOf(options), FieldValue::Number(Some(v))) => {
                let v = v.to_string();
                options.iter().any(|option| *option == v)
            }
            (Rule::Gte(n), FieldValue::Number(Some(v))) => v >= *n,
            (Rule::Lte(n), FieldValue::Number(Some(v))) => v <= *n,
            (Rule::Gte(n), FieldValue::Text(Some(s))) => s.chars().count() as i64 >= *n,
            (Rule::Lte(n), FieldValue::Text(Some(s))) => s.chars().count() as i64 <= *n,
            _ => true,
        }
    }
}

fn is_email(value: &str) -> bool {
    static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL_RE
        .get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(value))
}

/// Borrowed view of a field value handed to the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Number(Option<i64>),
    Flag(bool),
}

impl FieldValue<'_> {
    fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(value) => value.is_some_and(|s| !s.is_empty()),
            FieldValue::Number(value) => value.is_some(),
            FieldValue::Flag(value) => *value,
        }
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(value: &'a String) -> Self {
        FieldValue::Text(Some(value.as_str()))
    }
}

impl<'a> From<&'a Option<String>> for FieldValue<'a> {
    fn from(value: &'a Option<String>) -> Self {
        FieldValue::Text(value.as_deref())
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(value: i64) -> Self {
        FieldValue::Number(Some(value))
    }
}

impl From<Option<i64>> for FieldValue<'_> {
    fn from(value: Option<i64>) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

type Accessor<T> = Box<dyn Fn(&T) -> FieldValue<'_> + Send + Sync>;

struct FieldRules<T> {
    tag: FieldTag,
    rules: Vec<Rule>,
    accessor: Accessor<T>,
}

/// A rule that failed, with the structural path of the field it failed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// `TypeName.field_name`
    pub namespace: String,
    pub tag: FieldTag,
    pub rule: Rule,
}

/// Ordered field rules of one request type
pub struct RuleSet<T> {
    type_name: &'static str,
    fields: Vec<FieldRules<T>>,
}

impl<T> RuleSet<T> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
        }
    }

    pub fn field<F>(mut self, tag: FieldTag, rules: &[Rule], accessor: F) -> Self
    where
        F: Fn(&T) -> FieldValue<'_> + Send + Sync + 'static,
    {
        self.fields.push(FieldRules {
            tag,
            rules: rules.to_vec(),
            accessor: Box::new(accessor),
        });
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Field tags in declaration order
    pub fn tags(&self) -> impl Iterator<Item = &FieldTag> {
        self.fields.iter().map(|f| &f.tag)
    }

    /// Tag of a top-level field looked up by its Rust name
    pub fn tag_of(&self, field_name: &str) -> Option<&FieldTag> {
        self.tags().find(|tag| tag.name == field_name)
    }

    /// First failing rule, fields and rules visited in declaration order
    pub fn first_violation(&self, value: &T) -> Option<Violation> {
        for field in &self.fields {
            let current = (field.accessor)(value);
            if let Some(rule) = field.rules.iter().find(|rule| !rule.accepts(current)) {
                return Some(Violation {
                    namespace: format!("{}.{}", self.type_name, field.tag.name),
                    tag: field.tag,
                    rule: *rule,
                });
            }
        }
        None
    }
}

/// Request types with declarative rules
pub trait Validate: Sized + 'static {
    fn rules() -> &'static RuleSet<Self>;

    /// Types with an additional custom check return it here
    fn as_checker(&self) -> Option<&dyn Checker> {
        None
    }
}

/// Custom check run after every declarative rule has passed
pub trait Checker {
    fn check(&self, translator: &Translator) -> Result<(), ApiError>;
}

/// Validator bound to one language
#[derive(Debug, Clone)]
pub struct RequestValidator {
    translator: Translator,
}

impl RequestValidator {
    pub fn new(translator: Translator) -> Self {
        Self { translator }
    }

    pub fn language(&self) -> Language {
        self.translator.language()
    }

    /// Runs the declarative rules of `T`, then its custom check if it has one.
    ///
    /// A declarative failure becomes `ApiError::ValidationError` carrying the
    /// localized message and the offending field's wire key.
    pub fn check<T: Validate>(&self, value: &T) -> Result<(), ApiError> {
        let rules = T::rules();

        if let Some(violation) = rules.first_violation(value) {
            let label = self.translator.field_label(violation.tag.wire_name());
            let message = match self.translator.render(
                violation.rule.tag(),
                label,
                &violation.rule.param(),
            ) {
                Some(message) => message,
                None => {
                    error!(
                        language = %self.language(),
                        rule = violation.rule.tag(),
                        namespace = %violation.namespace,
                        "No message template for validation rule"
                    );
                    return Err(ApiError::InternalServer(
                        "validate check exception".to_string(),
                    ));
                }
            };

            // The label may be translated; report the declared wire name when the
            // namespace points at a top-level field of this type.
            let mut key = label.to_string();
            if let Some((_, field_name)) = violation.namespace.split_once('.') {
                if let Some(declared) = rules.tag_of(field_name).and_then(|t| t.declared_name()) {
                    key = declared.to_string();
                }
            }

            debug!(
                request_type = rules.type_name(),
                field = %key,
                rule = violation.rule.tag(),
                language = %self.language(),
                "Request validation failed"
            );

            return Err(ApiError::ValidationError {
                field: Some(ErrorField {
                    key,
                    value: message.clone(),
                }),
                message,
            });
        }

        if let Some(checker) = value.as_checker() {
            checker.check(&self.translator)?;
        }

        Ok(())
    }
}

/// Per-language validators, built once at startup
#[derive(Debug)]
pub struct LocaleCatalog {
    validators: HashMap<Language, RequestValidator>,
    fallback: RequestValidator,
}

impl LocaleCatalog {
    /// Loads every embedded catalog; `default_language` serves unknown locales
    pub fn load(default_language: Language) -> Result<Self, CatalogError> {
        let mut validators = HashMap::new();
        for language in Language::ALL {
            let translator = Translator::builtin(language)?;
            validators.insert(language, RequestValidator::new(translator));
        }

        let fallback = RequestValidator::new(Translator::builtin(default_language)?);

        Ok(Self {
            validators,
            fallback,
        })
    }

    pub fn default_language(&self) -> Language {
        self.fallback.language()
    }

    /// Validator for a locale tag; unknown or empty tags get the default language
    pub fn validator(&self, lang: &str) -> &RequestValidator {
        Language::parse(lang)
            .and_then(|language| self.validators.get(&language))
            .unwrap_or(&self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SignupForm {
        user_name: String,
        email: Option<String>,
        homepage: Option<String>,
        plan: String,
        seats: Option<i64>,
        password: String,
        password_confirm: String,
    }

    impl SignupForm {
        fn valid() -> Self {
            Self {
                user_name: "alice".to_string(),
                email: Some("alice@example.com".to_string()),
                homepage: None,
                plan: "free".to_string(),
                seats: Some(3),
                password: "secret".to_string(),
                password_confirm: "secret".to_string(),
            }
        }
    }

    impl Validate for SignupForm {
        fn rules() -> &'static RuleSet<Self> {
            static RULES: OnceLock<RuleSet<SignupForm>> = OnceLock::new();
            RULES.get_or_init(|| {
                RuleSet::<SignupForm>::new("SignupForm")
                    .field(
                        FieldTag::new("user_name").json("name"),
                        &[Rule::Required, Rule::Max(10)],
                        |f| (&f.user_name).into(),
                    )
                    .field(
                        FieldTag::new("email").form("mail"),
                        &[Rule::Required, Rule::Email],
                        |f| (&f.email).into(),
                    )
                    .field(
                        FieldTag::new("homepage"),
                        &[Rule::Url],
                        |f| (&f.homepage).into(),
                    )
                    .field(
                        FieldTag::new("plan").json("plan"),
                        &[Rule::OneOf(&["free", "pro"])],
                        |f| (&f.plan).into(),
                    )
                    .field(
                        FieldTag::new("seats").json("seats"),
                        &[Rule::Gte(1), Rule::Lte(50)],
                        |f| f.seats.into(),
                    )
            })
        }

        fn as_checker(&self) -> Option<&dyn Checker> {
            Some(self)
        }
    }

    impl Checker for SignupForm {
        fn check(&self, _translator: &Translator) -> Result<(), ApiError> {
            if self.password != self.password_confirm {
                return Err(ApiError::ValidationError {
                    message: "passwords do not match".to_string(),
                    field: Some(ErrorField {
                        key: "password_confirm".to_string(),
                        value: "passwords do not match".to_string(),
                    }),
                });
            }
            Ok(())
        }
    }

    fn catalog() -> LocaleCatalog {
        LocaleCatalog::load(Language::English).unwrap()
    }

    fn error_field(result: Result<(), ApiError>) -> ErrorField {
        match result {
            Err(ApiError::ValidationError {
                field: Some(field), ..
            }) => field,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_wire_name_fallback_chain() {
        assert_eq!(FieldTag::new("a").json("x").form("y").wire_name(), "x");
        assert_eq!(FieldTag::new("a").form("y").wire_name(), "y");
        assert_eq!(FieldTag::new("a").wire_name(), "a");
        assert_eq!(FieldTag::new("a").json("-").form("y").wire_name(), "");
        assert_eq!(FieldTag::new("a").json("").form("y").wire_name(), "y");
    }

    #[test]
    fn test_valid_value_passes() {
        let catalog = catalog();
        assert!(catalog.validator("en_US").check(&SignupForm::valid()).is_ok());
    }

    #[test]
    fn test_missing_required_field_reports_wire_key() {
        let catalog = catalog();
        let mut form = SignupForm::valid();
        form.user_name = String::new();

        let field = error_field(catalog.validator("en_US").check(&form));
        assert_eq!(field.key, "name");
        assert_eq!(field.value, "name is a required field");
    }

    #[test]
    fn test_form_name_used_when_no_json_name() {
        let catalog = catalog();
        let mut form = SignupForm::valid();
        form.email = None;

        let field = error_field(catalog.validator("en_US").check(&form));
        assert_eq!(field.key, "mail");
    }

    #[test]
    fn test_first_failure_wins() {
        let catalog = catalog();
        let mut form = SignupForm::valid();
        form.email = Some("not-an-email".to_string());
        form.plan = "enterprise".to_string();

        let field = error_field(catalog.validator("en_US").check(&form));
        assert_eq!(field.key, "mail");
        assert_eq!(field.value, "mail must be a valid email address");
    }

    #[test]
    fn test_optional_rules_skip_absent_values() {
        let catalog = catalog();
        let mut form = SignupForm::valid();
        form.homepage = None;
        form.seats = None;
        assert!(catalog.validator("en_US").check(&form).is_ok());

        form.homepage = Some("not a url".to_string());
        let field = error_field(catalog.validator("en_US").check(&form));
        assert_eq!(field.key, "homepage");
    }

    #[test]
    fn test_numeric_bounds_and_oneof() {
        let catalog = catalog();
        let mut form = SignupForm::valid();
        form.seats = Some(51);
        let field = error_field(catalog.validator("en_US").check(&form));
        assert_eq!(field.value, "seats must be 50 or less");

        let mut form = SignupForm::valid();
        form.plan = "gold".to_string();
        let field = error_field(catalog.validator("en_US").check(&form));
        assert_eq!(field.value, "plan must be one of [free pro]");
    }

    #[test]
    fn test_length_counts_characters() {
        let catalog = catalog();
        let mut form = SignupForm::valid();
        form.user_name = "问答社区问答社区问答".to_string();
        assert!(catalog.validator("en_US").check(&form).is_ok());

        form.user_name.push('区');
        let field = error_field(catalog.validator("en_US").check(&form));
        assert_eq!(field.value, "name must be a maximum of 10 characters in length");
    }

    #[test]
    fn test_translated_label_keeps_wire_key() {
        let catalog = catalog();
        let mut form = SignupForm::valid();
        form.user_name = String::new();

        let field = error_field(catalog.validator("zh_CN").check(&form));
        assert_eq!(field.key, "name");
        assert_eq!(field.value, "站点名称为必填字段");
    }

    #[test]
    fn test_unknown_locale_falls_back_to_default() {
        let catalog = catalog();
        let mut form = SignupForm::valid();
        form.user_name = String::new();

        let field = error_field(catalog.validator("xx_YY").check(&form));
        assert_eq!(field.value, "name is a required field");
        assert_eq!(catalog.validator("").language(), Language::English);
    }

    #[test]
    fn test_custom_check_runs_after_rules() {
        let catalog = catalog();
        let mut form = SignupForm::valid();
        form.password_confirm = "other".to_string();

        let field = error_field(catalog.validator("en_US").check(&form));
        assert_eq!(field.key, "password_confirm");

        // Declarative failures take precedence over the custom check
        form.user_name = String::new();
        let field = error_field(catalog.validator("en_US").check(&form));
        assert_eq!(field.key, "name");
    }

    #[test]
    fn test_missing_template_is_internal_error() {
        let translator = Translator::from_json(
            Language::English,
            r#"{"validation": {"email": "{0} bad"}}"#,
        )
        .unwrap();
        let validator = RequestValidator::new(translator);
        let mut form = SignupForm::valid();
        form.user_name = String::new();

        let result = validator.check(&form);
        assert!(matches!(result, Err(ApiError::InternalServer(_))));
    }

    #[test]
    fn test_violation_namespace() {
        let mut form = SignupForm::valid();
        form.plan = "gold".to_string();
        let violation = SignupForm::rules().first_violation(&form).unwrap();
        assert_eq!(violation.namespace, "SignupForm.plan");
        assert_eq!(violation.rule.tag(), "oneof");
    }
}
