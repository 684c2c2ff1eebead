use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::dto::JobEvent;
use crate::api::rest::routes::{self, RestState};
use crate::api::rest::sse::SseBroadcaster;
use crate::api::rest::sse_adapter::SseJobEventPublisher;
use crate::config::JobSchedulerConfig;
use crate::contract::client::JobSchedulerApi;
use crate::domain::ports::EnrichmentPort;
use crate::domain::repo::JobsRepository;
use crate::domain::service::{Service, ServiceConfig};
use crate::domain::session::SessionService;
use crate::gateways::local::JobSchedulerLocalClient;
use crate::infra::auth::{InMemorySessionStore, PasswordAuthenticator};
use crate::infra::enrichment;
use crate::infra::storage::memory_repo::InMemoryJobsRepository;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmJobsRepository;
use crate::infra::storage::seed;

/// The wired job_scheduler module: domain service, sessions, event fan-out.
#[derive(Clone)]
pub struct JobScheduler {
    service: Arc<Service>,
    sessions: Arc<SessionService>,
    events: SseBroadcaster<JobEvent>,
    refresh_interval: Duration,
}

impl JobScheduler {
    /// Wire the module on top of an already prepared repository.
    pub fn new(
        repo: Arc<dyn JobsRepository>,
        enrichment: Arc<dyn EnrichmentPort>,
        cfg: &JobSchedulerConfig,
    ) -> Self {
        debug!(
            "job_scheduler config: refresh_interval_secs={}, events_capacity={}",
            cfg.refresh_interval_secs, cfg.events_capacity
        );

        let events = SseBroadcaster::<JobEvent>::new(cfg.events_capacity);
        let publisher = Arc::new(SseJobEventPublisher::new(events.clone()));
        let service_config = ServiceConfig {
            enrichment_timeout: Duration::from_secs(cfg.enrichment.timeout_secs.max(1)),
        };
        let service = Service::new(repo.clone(), publisher, enrichment, service_config);

        let sessions = SessionService::new(
            Arc::new(PasswordAuthenticator::new(repo)),
            Arc::new(InMemorySessionStore::new()),
        );

        Self {
            service: Arc::new(service),
            sessions: Arc::new(sessions),
            events,
            refresh_interval: Duration::from_secs(cfg.refresh_interval_secs.max(1)),
        }
    }

    /// Migrate the database, apply seed data and wire the module.
    pub async fn with_database(
        conn: DatabaseConnection,
        cfg: &JobSchedulerConfig,
    ) -> anyhow::Result<Self> {
        info!("Running job_scheduler database migrations");
        Migrator::up(&conn, None).await?;
        info!("Job scheduler migrations completed successfully");

        let repo: Arc<dyn JobsRepository> = Arc::new(SeaOrmJobsRepository::new(conn));
        seed::seed(repo.as_ref(), &cfg.seed).await?;
        Ok(Self::new(repo, enrichment::from_config(&cfg.enrichment), cfg))
    }

    /// In-process store, nothing persisted.
    pub async fn in_memory(cfg: &JobSchedulerConfig) -> anyhow::Result<Self> {
        let repo: Arc<dyn JobsRepository> = Arc::new(InMemoryJobsRepository::new());
        seed::seed(repo.as_ref(), &cfg.seed).await?;
        Ok(Self::new(repo, enrichment::from_config(&cfg.enrichment), cfg))
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn sessions(&self) -> Arc<SessionService> {
        self.sessions.clone()
    }

    /// In-process client for other modules.
    pub fn client(&self) -> Arc<dyn JobSchedulerApi> {
        Arc::new(JobSchedulerLocalClient::new(self.service.clone()))
    }

    /// Mount the REST routes on `router`.
    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        info!("Registering job_scheduler REST routes");
        routes::register_routes(
            router,
            RestState {
                service: self.service.clone(),
                sessions: self.sessions.clone(),
                events: self.events.clone(),
                refresh_interval: self.refresh_interval,
            },
        )
    }
}
