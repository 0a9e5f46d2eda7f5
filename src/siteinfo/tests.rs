// src/siteinfo/tests.rs

use super::models::*;
use super::options::{language_options, theme_options};
use crate::common::validation::LocaleCatalog;
use crate::common::ApiError;
use crate::i18n::Language;
use crate::revisions::models::OBJECT_TYPE_SITE_INFO;
use crate::services::email::tests::next_report;
use crate::services::encryption::SecretCipher;
use crate::test_support::{test_app, test_app_without_cipher};

const ADMIN_ID: &str = "U_ADMIN0";

fn general_req() -> SiteGeneralReq {
    SiteGeneralReq {
        name: "My Forum".to_string(),
        short_description: "Questions and answers".to_string(),
        description: "A place to ask".to_string(),
        site_url: "https://forum.example.com/community/".to_string(),
        contact_email: "admin@example.com".to_string(),
    }
}

fn interface_req(theme: &str, language: &str) -> SiteInterfaceReq {
    SiteInterfaceReq {
        logo: String::new(),
        theme: theme.to_string(),
        language: language.to_string(),
    }
}

fn smtp_req(recipient: &str) -> UpdateSmtpConfigReq {
    UpdateSmtpConfigReq {
        from_email: "noreply@example.com".to_string(),
        from_name: "Forum".to_string(),
        smtp_host: "smtp.example.com".to_string(),
        smtp_port: 587,
        encryption: "TLS".to_string(),
        smtp_username: "mailer".to_string(),
        smtp_password: "hunter2".to_string(),
        smtp_authentication: true,
        test_email_recipient: recipient.to_string(),
    }
}

#[tokio::test]
async fn test_save_then_get_general_normalizes_url() {
    let app = test_app().await;
    let service = &app.state.site_info_service;

    service.save_site_general(ADMIN_ID, general_req()).await.unwrap();

    let stored = service.get_site_general().await.unwrap();
    let mut expected = general_req();
    expected.site_url = "https://forum.example.com/community".to_string();
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn test_unknown_theme_is_not_found_and_not_persisted() {
    let app = test_app().await;
    let service = &app.state.site_info_service;
    let before = service.get_site_interface().await.unwrap();

    let result = service.save_site_interface(ADMIN_ID, interface_req("neon", "en_US")).await;
    match result {
        Err(ApiError::NotFound(msg)) => assert_eq!(msg, "theme not found"),
        other => panic!("expected not found, got {:?}", other),
    }
    assert_eq!(service.get_site_interface().await.unwrap(), before);
}

#[tokio::test]
async fn test_unsupported_language_is_not_found_and_not_persisted() {
    let app = test_app().await;
    let service = &app.state.site_info_service;
    let before = service.get_site_interface().await.unwrap();

    let result = service.save_site_interface(ADMIN_ID, interface_req("dark", "xx_XX")).await;
    match result {
        Err(ApiError::NotFound(msg)) => assert_eq!(msg, "language not found"),
        other => panic!("expected not found, got {:?}", other),
    }
    assert_eq!(service.get_site_interface().await.unwrap(), before);
}

#[tokio::test]
async fn test_save_interface_with_known_options() {
    let app = test_app().await;
    let service = &app.state.site_info_service;

    service.save_site_interface(ADMIN_ID, interface_req("dark", "vi_VN")).await.unwrap();
    assert_eq!(
        service.get_site_interface().await.unwrap(),
        interface_req("dark", "vi_VN")
    );
}

#[tokio::test]
async fn test_saved_sections_are_kept_as_revisions() {
    let app = test_app().await;
    let service = &app.state.site_info_service;
    let revisions = &app.state.revision_service;

    service.save_site_general(ADMIN_ID, general_req()).await.unwrap();
    // Same content again adds nothing
    service.save_site_general(ADMIN_ID, general_req()).await.unwrap();

    let mut renamed = general_req();
    renamed.name = "Renamed Forum".to_string();
    service.save_site_general(ADMIN_ID, renamed).await.unwrap();

    let list = revisions.get_revision_list(SITE_TYPE_GENERAL).await.unwrap();
    let titles: Vec<_> = list.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, ["Renamed Forum", "My Forum"]);
    assert_eq!(list[0].user_id, ADMIN_ID);
    assert_eq!(list[0].object_type, OBJECT_TYPE_SITE_INFO);

    let last = revisions.get_last_revision(SITE_TYPE_GENERAL).await.unwrap().unwrap();
    let stored: SiteGeneralReq = serde_json::from_str(&last.content).unwrap();
    assert_eq!(stored.site_url, "https://forum.example.com/community");

    // Rejected interface changes leave no history
    let _ = service.save_site_interface(ADMIN_ID, interface_req("neon", "en_US")).await;
    assert!(revisions.get_revision_list(SITE_TYPE_INTERFACE).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_section_is_not_found() {
    let app = test_app().await;
    sqlx::query("DELETE FROM site_info WHERE type = 'general'")
        .execute(&app.state.db)
        .await
        .unwrap();

    let result = app.state.site_info_service.get_site_general().await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));

    let public = app.state.site_info_common.get_site_info().await.unwrap();
    assert!(public.general.is_none());
    assert!(public.interface.is_some());
}

#[tokio::test]
async fn test_malformed_stored_json_is_internal_error() {
    let app = test_app().await;
    sqlx::query("UPDATE site_info SET content = 'not json' WHERE type = 'interface'")
        .execute(&app.state.db)
        .await
        .unwrap();

    let result = app.state.site_info_service.get_site_interface().await;
    assert!(matches!(result, Err(ApiError::InternalServer(_))));
}

#[tokio::test]
async fn test_update_smtp_seals_password_and_sends_test_email() {
    let app = test_app().await;
    let service = &app.state.site_info_service;
    service.save_site_general(ADMIN_ID, general_req()).await.unwrap();
    let mut reports = app.state.email_service.subscribe();

    service
        .update_smtp_config(smtp_req("tester@example.com"))
        .await
        .unwrap();

    let config = service.get_smtp_config().await.unwrap();
    assert_eq!(config.smtp_host, "smtp.example.com");
    assert_eq!(config.smtp_port, 587);
    assert_eq!(config.smtp_password, "hunter2");

    let raw = sqlx::query_scalar::<_, String>("SELECT content FROM site_info WHERE type = 'smtp'")
        .fetch_one(&app.state.db)
        .await
        .unwrap();
    assert!(!raw.contains("hunter2"));
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(SecretCipher::is_sealed(stored["smtp_password"].as_str().unwrap()));

    let report = next_report(&mut reports).await;
    assert!(report.success);
    assert_eq!(report.subject, "[My Forum] Test Email");

    let sent = app.transport.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "tester@example.com");
}

#[tokio::test]
async fn test_update_smtp_without_recipient_sends_nothing() {
    let app = test_app().await;
    app.state
        .site_info_service
        .update_smtp_config(smtp_req(""))
        .await
        .unwrap();

    assert!(app.state.email_service.last_delivery().is_none());
    assert!(app.transport.sent.lock().await.is_empty());
}

#[tokio::test]
async fn test_smtp_password_with_sealed_prefix_reads_back() {
    let app = test_app().await;
    let service = &app.state.site_info_service;
    let mut req = smtp_req("");
    req.smtp_password = "enc:v1:hunter2".to_string();

    service.update_smtp_config(req).await.unwrap();
    let config = service.get_smtp_config().await.unwrap();
    assert_eq!(config.smtp_password, "enc:v1:hunter2");

    // Later updates still read the stored config
    service.update_smtp_config(smtp_req("")).await.unwrap();
    assert_eq!(service.get_smtp_config().await.unwrap().smtp_password, "hunter2");
}

#[tokio::test]
async fn test_smtp_password_with_sealed_prefix_rejected_without_key() {
    let app = test_app_without_cipher().await;
    let service = &app.state.site_info_service;
    let mut req = smtp_req("");
    req.smtp_password = "enc:v1:hunter2".to_string();

    let result = service.update_smtp_config(req).await;
    assert!(matches!(result, Err(ApiError::BadRequest(_))));

    // Nothing unreadable was stored
    service.update_smtp_config(smtp_req("")).await.unwrap();
    let config = service.get_smtp_config().await.unwrap();
    assert_eq!(config.smtp_password, "hunter2");
}

#[test]
fn test_option_lists() {
    let themes: Vec<_> = theme_options().into_iter().map(|o| o.value).collect();
    assert_eq!(themes, ["default", "light", "dark"]);

    let languages: Vec<_> = language_options().into_iter().map(|o| o.value).collect();
    assert_eq!(languages, ["en_US", "zh_CN", "vi_VN"]);
}

#[test]
fn test_missing_required_field_reports_wire_key() {
    let catalog = LocaleCatalog::load(Language::English).unwrap();
    let req = SiteGeneralReq {
        name: String::new(),
        ..general_req()
    };

    match catalog.validator("en_US").check(&req) {
        Err(ApiError::ValidationError { message, field: Some(field) }) => {
            assert_eq!(field.key, "name");
            assert_eq!(field.value, "name is a required field");
            assert_eq!(message, field.value);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_chinese_messages_keep_wire_key() {
    let catalog = LocaleCatalog::load(Language::English).unwrap();
    let req = SiteGeneralReq {
        site_url: "not a url".to_string(),
        ..general_req()
    };

    match catalog.validator("zh-CN,zh;q=0.9").check(&req) {
        Err(ApiError::ValidationError { field: Some(field), .. }) => {
            assert_eq!(field.key, "site_url");
            assert_eq!(field.value, "站点地址必须是一个有效的URL");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_unknown_locale_uses_default_messages() {
    let catalog = LocaleCatalog::load(Language::English).unwrap();
    let req = SiteInterfaceReq {
        theme: String::new(),
        ..interface_req("dark", "en_US")
    };

    match catalog.validator("fr_FR").check(&req) {
        Err(ApiError::ValidationError { field: Some(field), .. }) => {
            assert_eq!(field.key, "theme");
            assert_eq!(field.value, "theme is a required field");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_smtp_custom_check_runs_after_rules() {
    let catalog = LocaleCatalog::load(Language::English).unwrap();
    let validator = catalog.validator("en_US");

    let req = UpdateSmtpConfigReq {
        smtp_username: String::new(),
        ..smtp_req("")
    };
    match validator.check(&req) {
        Err(ApiError::ValidationError { field: Some(field), .. }) => {
            assert_eq!(field.key, "smtp_username");
        }
        other => panic!("expected custom check failure, got {:?}", other),
    }

    // Declarative rules fail first
    let req = UpdateSmtpConfigReq {
        smtp_username: String::new(),
        encryption: "STARTTLS".to_string(),
        ..smtp_req("")
    };
    match validator.check(&req) {
        Err(ApiError::ValidationError { field: Some(field), .. }) => {
            assert_eq!(field.key, "encryption");
        }
        other => panic!("expected rule failure, got {:?}", other),
    }

    assert!(validator.check(&smtp_req("tester@example.com")).is_ok());
}
