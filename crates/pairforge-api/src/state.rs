//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST
//! API. Services are generic over store/gateway/hasher traits, but AppState
//! pins them to the concrete infra implementations.

use std::sync::Arc;

use pairforge_core::service::ledger::LedgerService;
use pairforge_core::service::orchestrator::CommitOrchestrator;
use pairforge_core::service::pipeline::DraftPipeline;
use pairforge_infra::config::{load_global_config, resolve_data_dir};
use pairforge_infra::crypto::hash::Sha256ContentHasher;
use pairforge_infra::github::GitHubGateway;
use pairforge_infra::sqlite::commit::SqliteCommitLog;
use pairforge_infra::sqlite::draft::SqliteDraftStore;
use pairforge_infra::sqlite::ledger::SqliteVersionLedger;
use pairforge_infra::sqlite::pool::DatabasePool;
use pairforge_infra::token::build_token_chain;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteDraftPipeline =
    DraftPipeline<SqliteDraftStore, SqliteVersionLedger, Sha256ContentHasher>;

pub type ConcreteLedgerService = LedgerService<SqliteVersionLedger, Sha256ContentHasher>;

pub type ConcreteCommitOrchestrator =
    CommitOrchestrator<SqliteVersionLedger, SqliteCommitLog, GitHubGateway>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ConcreteDraftPipeline>,
    pub ledger: Arc<ConcreteLedgerService>,
    pub orchestrator: Arc<ConcreteCommitOrchestrator>,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("pairforge.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        // Wire the draft pipeline
        let pipeline = DraftPipeline::new(
            SqliteDraftStore::new(db_pool.clone()),
            SqliteVersionLedger::new(db_pool.clone()),
            Sha256ContentHasher::new(),
            config.validation.clone(),
        );

        // Wire the ledger service (file import + history reads)
        let ledger = LedgerService::new(
            SqliteVersionLedger::new(db_pool.clone()),
            Sha256ContentHasher::new(),
        );

        // Wire the commit orchestrator with the GitHub gateway and the
        // credential chain (env var, then config token).
        let gateway = GitHubGateway::new().with_api_base(config.github.api_base.clone());
        let tokens = build_token_chain(&config.github);
        let orchestrator = CommitOrchestrator::new(
            SqliteVersionLedger::new(db_pool.clone()),
            SqliteCommitLog::new(db_pool.clone()),
            gateway,
            tokens,
            config.validation.clone(),
        );

        Ok(Self {
            pipeline: Arc::new(pipeline),
            ledger: Arc::new(ledger),
            orchestrator: Arc::new(orchestrator),
        })
    }
}
