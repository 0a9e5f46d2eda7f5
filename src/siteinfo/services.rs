// src/siteinfo/services.rs

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::models::{
    GetSmtpConfigResp, SiteGeneralReq, SiteGeneralResp, SiteInfoResp, SiteInterfaceReq,
    SiteInterfaceResp, UpdateSmtpConfigReq, SITE_TYPE_GENERAL, SITE_TYPE_INTERFACE,
};
use super::options::{is_language_option, is_theme_option};
use super::repo::SiteInfoRepo;
use crate::common::{safe_email_log, ApiError};
use crate::revisions::models::{NewRevision, OBJECT_TYPE_SITE_INFO};
use crate::revisions::services::RevisionService;
use crate::services::email::{EmailConfig, EmailService};

async fn load_section<T: DeserializeOwned>(
    repo: &dyn SiteInfoRepo,
    site_type: &str,
) -> Result<T, ApiError> {
    let row = repo
        .get_by_type(site_type)
        .await?
        .ok_or_else(|| ApiError::NotFound("site info not found".to_string()))?;

    serde_json::from_str(&row.content).map_err(|e| {
        error!(error = %e, site_type = %site_type, "Stored site info is not valid JSON");
        ApiError::InternalServer("invalid stored site info".to_string())
    })
}

/// Stores `section` and returns the JSON written
async fn save_section<T: Serialize>(
    repo: &dyn SiteInfoRepo,
    site_type: &str,
    section: &T,
) -> Result<String, ApiError> {
    let content = serde_json::to_string(section).map_err(|e| {
        error!(error = %e, site_type = %site_type, "Failed to serialize site info");
        ApiError::InternalServer("failed to save site info".to_string())
    })?;
    repo.save_by_type(site_type, &content).await?;
    Ok(content)
}

/// Read-only access to the general and interface sections
pub struct SiteInfoCommonService {
    repo: Arc<dyn SiteInfoRepo>,
}

impl SiteInfoCommonService {
    pub fn new(repo: Arc<dyn SiteInfoRepo>) -> Self {
        Self { repo }
    }

    pub async fn get_site_general(&self) -> Result<SiteGeneralResp, ApiError> {
        load_section(self.repo.as_ref(), SITE_TYPE_GENERAL).await
    }

    pub async fn get_site_interface(&self) -> Result<SiteInterfaceResp, ApiError> {
        load_section(self.repo.as_ref(), SITE_TYPE_INTERFACE).await
    }

    /// Both sections for the public endpoint; missing sections are `None`
    pub async fn get_site_info(&self) -> Result<SiteInfoResp, ApiError> {
        let general = match self.get_site_general().await {
            Ok(general) => Some(general),
            Err(ApiError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };
        let interface = match self.get_site_interface().await {
            Ok(interface) => Some(interface),
            Err(ApiError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };
        Ok(SiteInfoResp { general, interface })
    }
}

/// Back office site configuration
///
/// Saved general and interface sections are kept as revisions whose object id
/// is the section type, so `/answer/api/v1/revisions?object_id=general` shows
/// the edit history.
pub struct SiteInfoService {
    repo: Arc<dyn SiteInfoRepo>,
    common: Arc<SiteInfoCommonService>,
    email: Arc<EmailService>,
    revisions: Arc<RevisionService>,
}

impl SiteInfoService {
    pub fn new(
        repo: Arc<dyn SiteInfoRepo>,
        common: Arc<SiteInfoCommonService>,
        email: Arc<EmailService>,
        revisions: Arc<RevisionService>,
    ) -> Self {
        Self {
            repo,
            common,
            email,
            revisions,
        }
    }

    async fn record_revision(
        &self,
        user_id: &str,
        site_type: &str,
        title: &str,
        content: String,
    ) -> Result<(), ApiError> {
        self.revisions
            .record_if_changed(&NewRevision {
                user_id: user_id.to_string(),
                object_type: OBJECT_TYPE_SITE_INFO,
                object_id: site_type.to_string(),
                title: title.to_string(),
                content,
                log: format!("{} updated", site_type),
            })
            .await?;
        Ok(())
    }

    pub async fn get_site_general(&self) -> Result<SiteGeneralResp, ApiError> {
        self.common.get_site_general().await
    }

    pub async fn get_site_interface(&self) -> Result<SiteInterfaceResp, ApiError> {
        self.common.get_site_interface().await
    }

    pub async fn save_site_general(
        &self,
        user_id: &str,
        mut req: SiteGeneralReq,
    ) -> Result<(), ApiError> {
        req.format_site_url();
        let content = save_section(self.repo.as_ref(), SITE_TYPE_GENERAL, &req).await?;
        info!(site_url = %req.site_url, "Site general settings saved");
        self.record_revision(user_id, SITE_TYPE_GENERAL, &req.name, content)
            .await
    }

    /// Theme and language must be known options; nothing is stored otherwise
    pub async fn save_site_interface(
        &self,
        user_id: &str,
        req: SiteInterfaceReq,
    ) -> Result<(), ApiError> {
        if !is_theme_option(&req.theme) {
            warn!(theme = %req.theme, "Rejected unknown theme");
            return Err(ApiError::NotFound("theme not found".to_string()));
        }
        if !is_language_option(&req.language) {
            warn!(language = %req.language, "Rejected unsupported language");
            return Err(ApiError::NotFound("language not found".to_string()));
        }

        let content = save_section(self.repo.as_ref(), SITE_TYPE_INTERFACE, &req).await?;
        info!(theme = %req.theme, language = %req.language, "Site interface settings saved");
        self.record_revision(user_id, SITE_TYPE_INTERFACE, "Site interface", content)
            .await
    }

    pub async fn get_smtp_config(&self) -> Result<GetSmtpConfigResp, ApiError> {
        let config = self.email.get_email_config().await?;
        Ok(GetSmtpConfigResp {
            from_email: config.from_email,
            from_name: config.from_name,
            smtp_host: config.smtp_host,
            smtp_port: config.smtp_port,
            encryption: config.encryption,
            smtp_username: config.smtp_username,
            smtp_password: config.smtp_password,
            smtp_authentication: config.smtp_authentication,
        })
    }

    /// Replaces the stored SMTP settings with the request and, when a test
    /// recipient is given, queues a test email without waiting for delivery
    pub async fn update_smtp_config(&self, req: UpdateSmtpConfigReq) -> Result<(), ApiError> {
        let mut config = self.email.get_email_config().await?;
        merge_smtp_config(&mut config, &req);
        self.email.set_email_config(&config).await?;
        info!(smtp_host = %config.smtp_host, "SMTP settings updated");

        if !req.test_email_recipient.is_empty() {
            let (subject, body) = self.email.test_template().await?;
            if let Err(e) = self
                .email
                .send(&req.test_email_recipient, subject, body)
                .await
            {
                error!(
                    error = %e,
                    to = %safe_email_log(&req.test_email_recipient),
                    "Failed to queue SMTP test email"
                );
            }
        }

        Ok(())
    }
}

fn merge_smtp_config(config: &mut EmailConfig, req: &UpdateSmtpConfigReq) {
    config.from_email = req.from_email.clone();
    config.from_name = req.from_name.clone();
    config.smtp_host = req.smtp_host.clone();
    config.smtp_port = req.smtp_port;
    config.encryption = req.encryption.clone();
    config.smtp_username = req.smtp_username.clone();
    config.smtp_password = req.smtp_password.clone();
    config.smtp_authentication = req.smtp_authentication;
}
