//! Component factory: builds repositories, gateway and providers from config.
//! Isolates assembly from the router and the HTTP surface.

use anyhow::{Context, Result};
use jobspy_client::{JobProvider, JobSpyClient};
use portal_auth::{AuthProvider, FernetCipher, PortalAuthService, PortalClient};
use std::sync::Arc;
use storage::{
    BotTextRepository, CourseRepository, InteractionRepository, SearchLogRepository,
    SessionRepository, SqlitePoolManager,
};
use tracing::{info, instrument};
use waha_gateway::WahaClient;

use crate::config::BotConfig;
use crate::flows::{AuthenticationFlow, JobSearchFlow, MenuFlow};
use crate::messenger::Messenger;
use crate::router::ConversationRouter;

/// Core dependencies of the router and the HTTP surface.
#[derive(Clone)]
pub struct BotComponents {
    pub sessions: Arc<SessionRepository>,
    pub courses: Arc<CourseRepository>,
    pub interactions: Arc<InteractionRepository>,
    pub search_logs: Arc<SearchLogRepository>,
    pub texts: Arc<BotTextRepository>,
    pub gateway: Arc<dyn capy_core::Gateway>,
    pub auth: Arc<dyn AuthProvider>,
    pub jobs: Arc<dyn JobProvider>,
}

/// Builds all production components from config.
#[instrument(skip(config))]
pub async fn build_components(config: &BotConfig) -> Result<BotComponents> {
    let pool = SqlitePoolManager::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    let sessions = Arc::new(
        SessionRepository::new(pool.clone())
            .await
            .context("Failed to initialize session storage")?,
    );
    let courses = Arc::new(
        CourseRepository::new(pool.clone())
            .await
            .context("Failed to initialize course storage")?,
    );
    let interactions = Arc::new(
        InteractionRepository::new(pool.clone())
            .await
            .context("Failed to initialize interaction log")?,
    );
    let search_logs = Arc::new(
        SearchLogRepository::new(pool.clone())
            .await
            .context("Failed to initialize search log")?,
    );
    let texts = Arc::new(
        BotTextRepository::new(pool)
            .await
            .context("Failed to initialize bot texts")?,
    );

    let gateway: Arc<dyn capy_core::Gateway> = Arc::new(
        WahaClient::new(config.waha.clone()).context("Failed to build WAHA client")?,
    );

    let cipher = Arc::new(
        FernetCipher::from_secret(&config.secret_key)
            .context("Failed to derive credential cipher")?,
    );
    let portal =
        PortalClient::new(config.portal.clone()).context("Failed to build portal client")?;
    let auth: Arc<dyn AuthProvider> =
        Arc::new(PortalAuthService::new(portal, sessions.clone(), cipher));

    let jobs: Arc<dyn JobProvider> = Arc::new(
        JobSpyClient::new(config.jobspy.clone()).context("Failed to build JobSpy client")?,
    );

    info!(
        database_url = %config.database_url,
        waha_url = %config.waha.base_url,
        "Components initialized"
    );

    Ok(BotComponents {
        sessions,
        courses,
        interactions,
        search_logs,
        texts,
        gateway,
        auth,
        jobs,
    })
}

/// Wires the messenger, flows and router from components.
pub fn build_router(config: &BotConfig, components: &BotComponents) -> Arc<ConversationRouter> {
    let messenger = Arc::new(Messenger::new(
        components.gateway.clone(),
        components.interactions.clone(),
        components.texts.clone(),
    ));

    let auth_flow = Arc::new(AuthenticationFlow::new(
        messenger.clone(),
        components.sessions.clone(),
        components.auth.clone(),
    ));
    let job_flow = Arc::new(JobSearchFlow::new(
        messenger.clone(),
        components.sessions.clone(),
        components.courses.clone(),
        components.jobs.clone(),
        components.search_logs.clone(),
        config.search_result_limit,
    ));
    let menu_flow = Arc::new(MenuFlow::new(messenger.clone()));

    Arc::new(ConversationRouter::new(
        components.sessions.clone(),
        messenger,
        auth_flow,
        job_flow,
        menu_flow,
    ))
}
