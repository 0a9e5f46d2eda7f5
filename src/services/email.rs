// src/services/email.rs
//! Outgoing email: SMTP settings storage, templates and a background delivery worker

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::common::{now_timestamp, safe_email_log, ApiError};
use crate::services::encryption::SecretCipher;
use crate::siteinfo::models::SITE_TYPE_SMTP;
use crate::siteinfo::repo::SiteInfoRepo;
use crate::siteinfo::services::SiteInfoCommonService;

const DEFAULT_SITE_NAME: &str = "Answer";

/// SMTP settings, stored as the `smtp` site info section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub from_email: String,
    pub from_name: String,
    pub smtp_host: String,
    pub smtp_port: i64,
    /// `SSL`, `TLS` (STARTTLS) or empty for a plain connection
    pub encryption: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub smtp_authentication: bool,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from_email: String::new(),
            from_name: String::new(),
            smtp_host: String::new(),
            smtp_port: 465,
            encryption: "SSL".to_string(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            smtp_authentication: true,
        }
    }
}

impl EmailConfig {
    /// Defaults seeded on first start from `SMTP_*` variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            from_email: env::var("SMTP_FROM_EMAIL").unwrap_or_default(),
            from_name: env::var("SMTP_FROM_NAME").unwrap_or_default(),
            smtp_host: env::var("SMTP_HOST").unwrap_or_default(),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.smtp_port),
            encryption: env::var("SMTP_ENCRYPTION").unwrap_or(defaults.encryption),
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            smtp_authentication: env::var("SMTP_AUTHENTICATION")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(defaults.smtp_authentication),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.smtp_host.is_empty() && !self.from_email.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("SMTP is not configured")]
    NotConfigured,

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("SMTP delivery failed: {0}")]
    Transport(String),

    #[error("Email worker is not running")]
    WorkerStopped,
}

/// Sends one fully rendered email
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, config: &EmailConfig, email: &OutgoingEmail) -> Result<(), EmailError>;
}

/// SMTP delivery through lettre; a new connection per message
#[derive(Debug, Default)]
pub struct SmtpMailer;

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, config: &EmailConfig, email: &OutgoingEmail) -> Result<(), EmailError> {
        if !config.is_configured() {
            return Err(EmailError::NotConfigured);
        }

        let from_address: Address = config
            .from_email
            .parse()
            .map_err(|_| EmailError::InvalidAddress(config.from_email.clone()))?;
        let to_address: Address = email
            .to
            .parse()
            .map_err(|_| EmailError::InvalidAddress(email.to.clone()))?;

        let from_name = (!config.from_name.is_empty()).then(|| config.from_name.clone());

        let message = Message::builder()
            .from(Mailbox::new(from_name, from_address))
            .to(Mailbox::new(None, to_address))
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let port = u16::try_from(config.smtp_port)
            .map_err(|_| EmailError::Transport(format!("invalid SMTP port {}", config.smtp_port)))?;

        let mut builder = match config.encryption.as_str() {
            "SSL" => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host),
            "TLS" => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host),
            _ => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(
                config.smtp_host.as_str(),
            )),
        }
        .map_err(|e| EmailError::Transport(e.to_string()))?
        .port(port);

        if config.smtp_authentication {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }

        builder
            .build()
            .send(message)
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// Outcome of the most recent delivery attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    /// Masked recipient
    pub to: String,
    pub subject: String,
    pub success: bool,
    pub error: Option<String>,
    pub finished_at: String,
}

struct EmailJob {
    config: EmailConfig,
    email: OutgoingEmail,
}

/// Handle to a running [`EmailWorker`]
#[derive(Clone)]
pub struct EmailQueue {
    sender: mpsc::UnboundedSender<EmailJob>,
    reports: watch::Receiver<Option<DeliveryReport>>,
}

impl EmailQueue {
    /// Queues `email` for delivery and returns without waiting for it
    pub fn enqueue(&self, config: EmailConfig, email: OutgoingEmail) -> Result<(), EmailError> {
        self.sender
            .send(EmailJob { config, email })
            .map_err(|_| EmailError::WorkerStopped)
    }

    pub fn last_report(&self) -> Option<DeliveryReport> {
        self.reports.borrow().clone()
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<Option<DeliveryReport>> {
        self.reports.clone()
    }
}

/// Background task delivering queued emails one at a time, once each
pub struct EmailWorker;

impl EmailWorker {
    pub fn spawn(transport: Arc<dyn MailTransport>) -> EmailQueue {
        let (sender, mut receiver) = mpsc::unbounded_channel::<EmailJob>();
        let (report_tx, report_rx) = watch::channel(None);

        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                let to = safe_email_log(&job.email.to);
                let result = transport.send(&job.config, &job.email).await;

                match &result {
                    Ok(()) => info!(to = %to, subject = %job.email.subject, "Email sent"),
                    Err(e) => error!(
                        error = %e,
                        to = %to,
                        subject = %job.email.subject,
                        "Email delivery failed"
                    ),
                }

                report_tx.send_replace(Some(DeliveryReport {
                    to,
                    subject: job.email.subject,
                    success: result.is_ok(),
                    error: result.err().map(|e| e.to_string()),
                    finished_at: now_timestamp(),
                }));
            }
            debug!("Email worker stopped");
        });

        EmailQueue {
            sender,
            reports: report_rx,
        }
    }
}

pub fn test_email_subject(site_name: &str) -> String {
    format!("[{}] Test Email", site_name)
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn generate_test_email(site_name: &str) -> String {
    let site_name = html_escape(site_name);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background-color: #0033FF; color: white; padding: 20px; text-align: center; }}
        .content {{ padding: 20px; background-color: #f9f9f9; }}
        .footer {{ padding: 20px; text-align: center; font-size: 12px; color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>{}</h1>
        </div>
        <div class="content">
            <p>This is a test email from {}.</p>
            <p>If you received it, your SMTP settings are working.</p>
        </div>
        <div class="footer">
            <p>This is an automated message. Please do not reply directly to this email.</p>
        </div>
    </div>
</body>
</html>"#,
        site_name, site_name
    )
}

/// SMTP settings access and email dispatch
pub struct EmailService {
    repo: Arc<dyn SiteInfoRepo>,
    site_info: Arc<SiteInfoCommonService>,
    cipher: Option<Arc<SecretCipher>>,
    queue: EmailQueue,
}

impl EmailService {
    pub fn new(
        repo: Arc<dyn SiteInfoRepo>,
        site_info: Arc<SiteInfoCommonService>,
        cipher: Option<Arc<SecretCipher>>,
        queue: EmailQueue,
    ) -> Self {
        Self {
            repo,
            site_info,
            cipher,
            queue,
        }
    }

    /// Stored SMTP settings with the password opened; defaults when none are stored
    pub async fn get_email_config(&self) -> Result<EmailConfig, ApiError> {
        let Some(row) = self.repo.get_by_type(SITE_TYPE_SMTP).await? else {
            return Ok(EmailConfig::default());
        };

        let mut config: EmailConfig = serde_json::from_str(&row.content).map_err(|e| {
            error!(error = %e, "Stored SMTP settings are not valid JSON");
            ApiError::InternalServer("invalid stored smtp settings".to_string())
        })?;

        match &self.cipher {
            Some(cipher) => {
                config.smtp_password = cipher.open(&config.smtp_password).map_err(|e| {
                    error!(error = %e, "Failed to open stored SMTP password");
                    ApiError::InternalServer("failed to read smtp password".to_string())
                })?;
            }
            None if SecretCipher::is_sealed(&config.smtp_password) => {
                error!("SMTP password is encrypted but ENCRYPTION_MASTER_KEY is not set");
                return Err(ApiError::InternalServer(
                    "failed to read smtp password".to_string(),
                ));
            }
            None => {}
        }

        Ok(config)
    }

    /// Persists `config`, sealing the password when a key is configured
    pub async fn set_email_config(&self, config: &EmailConfig) -> Result<(), ApiError> {
        let mut stored = config.clone();
        if let Some(cipher) = &self.cipher {
            stored.smtp_password = cipher.seal(&stored.smtp_password).map_err(|e| {
                error!(error = %e, "Failed to encrypt SMTP password");
                ApiError::InternalServer("failed to store smtp password".to_string())
            })?;
        } else if SecretCipher::is_sealed(&stored.smtp_password) {
            // Stored as-is it would read back as an encrypted value
            return Err(ApiError::BadRequest(
                "smtp password cannot start with enc:v1: while ENCRYPTION_MASTER_KEY is not set"
                    .to_string(),
            ));
        } else if !stored.smtp_password.is_empty() {
            warn!("ENCRYPTION_MASTER_KEY not set, SMTP password stored in plain text");
        }

        let content = serde_json::to_string(&stored).map_err(|e| {
            error!(error = %e, "Failed to serialize SMTP settings");
            ApiError::InternalServer("failed to store smtp settings".to_string())
        })?;

        self.repo.save_by_type(SITE_TYPE_SMTP, &content).await
    }

    /// Subject and body of the SMTP test email
    pub async fn test_template(&self) -> Result<(String, String), ApiError> {
        let site_name = match self.site_info.get_site_general().await {
            Ok(general) if !general.name.is_empty() => general.name,
            Ok(_) | Err(ApiError::NotFound(_)) => DEFAULT_SITE_NAME.to_string(),
            Err(e) => return Err(e),
        };

        Ok((test_email_subject(&site_name), generate_test_email(&site_name)))
    }

    /// Hands the email to the worker using the current SMTP settings
    pub async fn send(&self, to: &str, subject: String, html_body: String) -> Result<(), ApiError> {
        let config = self.get_email_config().await?;

        self.queue
            .enqueue(
                config,
                OutgoingEmail {
                    to: to.to_string(),
                    subject,
                    html_body,
                },
            )
            .map_err(|e| {
                error!(error = %e, to = %safe_email_log(to), "Failed to queue email");
                ApiError::InternalServer("email worker unavailable".to_string())
            })?;

        debug!(to = %safe_email_log(to), "Email queued");
        Ok(())
    }

    pub fn last_delivery(&self) -> Option<DeliveryReport> {
        self.queue.last_report()
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<Option<DeliveryReport>> {
        self.queue.subscribe()
    }
}
