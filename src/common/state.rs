// Application state shared across all modules

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;

use crate::common::config::AppConfig;
use crate::common::dev_mode::DevModeConfig;
use crate::common::validation::LocaleCatalog;
use crate::revisions::repo::SqliteRevisionRepo;
use crate::revisions::services::RevisionService;
use crate::services::cache::CacheService;
use crate::services::email::{EmailService, EmailWorker, MailTransport};
use crate::services::encryption::SecretCipher;
use crate::siteinfo::repo::{SiteInfoRepo, SqliteSiteInfoRepo};
use crate::siteinfo::services::{SiteInfoCommonService, SiteInfoService};
use crate::users::repo::SqliteUserBackyardRepo;
use crate::users::services::UserBackyardService;

/// Database pool, services and configuration handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    pub admin_emails: HashSet<String>,
    pub dev_mode: DevModeConfig,
    pub catalog: Arc<LocaleCatalog>,
    pub cache: CacheService,
    pub site_info_common: Arc<SiteInfoCommonService>,
    pub site_info_service: Arc<SiteInfoService>,
    pub email_service: Arc<EmailService>,
    pub user_backyard_service: Arc<UserBackyardService>,
    pub revision_service: Arc<RevisionService>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Wires the services on top of `db` and starts the email worker
    pub fn new(
        db: SqlitePool,
        config: &AppConfig,
        dev_mode: DevModeConfig,
        catalog: LocaleCatalog,
        cipher: Option<SecretCipher>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        let cache = CacheService::new();

        let site_info_repo: Arc<dyn SiteInfoRepo> = Arc::new(SqliteSiteInfoRepo::new(db.clone()));
        let site_info_common = Arc::new(SiteInfoCommonService::new(site_info_repo.clone()));

        let email_service = Arc::new(EmailService::new(
            site_info_repo.clone(),
            site_info_common.clone(),
            cipher.map(Arc::new),
            EmailWorker::spawn(transport),
        ));

        let revision_service = Arc::new(RevisionService::new(Arc::new(SqliteRevisionRepo::new(
            db.clone(),
        ))));

        let site_info_service = Arc::new(SiteInfoService::new(
            site_info_repo,
            site_info_common.clone(),
            email_service.clone(),
            revision_service.clone(),
        ));

        let user_backyard_service = Arc::new(UserBackyardService::new(Arc::new(
            SqliteUserBackyardRepo::new(db.clone(), cache.clone()),
        )));

        Self {
            db,
            jwt_secret: config.jwt_secret.clone(),
            admin_emails: config.admin_emails.clone(),
            dev_mode,
            catalog: Arc::new(catalog),
            cache,
            site_info_common,
            site_info_service,
            email_service,
            user_backyard_service,
            revision_service,
            started_at: Utc::now(),
        }
    }
}
