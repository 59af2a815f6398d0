//! Application state wiring all services together.
//!
//! AppState holds the concrete instances used by both the CLI and the
//! REST API. The engine and notifier are generic over repository/client
//! traits, but AppState pins them to the SQLite and LINE
//! implementations from greenroom-infra.

use std::sync::Arc;

use greenroom_core::dialogue::engine::DialogueEngine;
use greenroom_core::dialogue::locks::AccountLocks;
use greenroom_core::notify::DailyNotifier;
use greenroom_infra::config::Config;
use greenroom_infra::line::LineClient;
use greenroom_infra::sqlite::account::SqliteAccountRepository;
use greenroom_infra::sqlite::group::SqliteGroupRepository;
use greenroom_infra::sqlite::membership::SqliteMembershipRepository;
use greenroom_infra::sqlite::place::SqlitePlaceRepository;
use greenroom_infra::sqlite::pool::DatabasePool;
use greenroom_infra::sqlite::practice::SqlitePracticeRepository;
use greenroom_infra::sqlite::team::SqliteTeamRepository;
use greenroom_infra::sqlite::user::SqliteUserRepository;

/// Concrete type aliases pinned to the infra implementations.
pub type ConcreteEngine = DialogueEngine<
    SqliteAccountRepository,
    SqliteGroupRepository,
    SqliteMembershipRepository,
    SqlitePlaceRepository,
    SqlitePracticeRepository,
>;

pub type ConcreteNotifier =
    DailyNotifier<SqliteMembershipRepository, SqlitePracticeRepository, LineClient>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<SqliteAccountRepository>,
    pub groups: Arc<SqliteGroupRepository>,
    pub memberships: Arc<SqliteMembershipRepository>,
    pub places: Arc<SqlitePlaceRepository>,
    pub practices: Arc<SqlitePracticeRepository>,
    pub teams: Arc<SqliteTeamRepository>,
    pub users: Arc<SqliteUserRepository>,
    pub engine: Arc<ConcreteEngine>,
    pub notifier: Arc<ConcreteNotifier>,
    pub line: Arc<LineClient>,
    pub locks: Arc<AccountLocks>,
    pub config: Arc<Config>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: read config, connect to the
    /// database (running migrations), wire the engine and notifier.
    pub async fn init() -> anyhow::Result<Self> {
        let config = Config::from_env()?;
        Self::init_with_config(config).await
    }

    pub async fn init_with_config(config: Config) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&config.database_url).await?;

        let line = Arc::new(LineClient::new(config.line.channel_access_token.clone()));

        let engine = DialogueEngine::new(
            SqliteAccountRepository::new(db_pool.clone()),
            SqliteGroupRepository::new(db_pool.clone()),
            SqliteMembershipRepository::new(db_pool.clone()),
            SqlitePlaceRepository::new(db_pool.clone()),
            SqlitePracticeRepository::new(db_pool.clone()),
        );

        let notifier = DailyNotifier::new(
            SqliteMembershipRepository::new(db_pool.clone()),
            SqlitePracticeRepository::new(db_pool.clone()),
            LineClient::new(config.line.channel_access_token.clone()),
        );

        Ok(Self {
            accounts: Arc::new(SqliteAccountRepository::new(db_pool.clone())),
            groups: Arc::new(SqliteGroupRepository::new(db_pool.clone())),
            memberships: Arc::new(SqliteMembershipRepository::new(db_pool.clone())),
            places: Arc::new(SqlitePlaceRepository::new(db_pool.clone())),
            practices: Arc::new(SqlitePracticeRepository::new(db_pool.clone())),
            teams: Arc::new(SqliteTeamRepository::new(db_pool.clone())),
            users: Arc::new(SqliteUserRepository::new(db_pool.clone())),
            engine: Arc::new(engine),
            notifier: Arc::new(notifier),
            line,
            locks: Arc::new(AccountLocks::new()),
            config: Arc::new(config),
            db_pool,
        })
    }
}
