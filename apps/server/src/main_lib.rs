use std::sync::Arc;

use crate::{auth::AuthManager, config::Config};
use lifeplan_core::{
    goals::{GoalService, GoalServiceTrait, KeepStoredProgress, ProgressDerivation},
    schedules::{ScheduleService, ScheduleServiceTrait},
    users::{UserService, UserServiceTrait},
};
use lifeplan_storage_sqlite::{
    db::{self, write_actor},
    goals::GoalRepository,
    schedules::ScheduleRepository,
    users::UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub goal_service: Arc<dyn GoalServiceTrait + Send + Sync>,
    pub schedule_service: Arc<dyn ScheduleServiceTrait + Send + Sync>,
    pub user_service: Arc<dyn UserServiceTrait + Send + Sync>,
    pub auth: Arc<AuthManager>,
    pub db_path: String,
}

/// Installs the global subscriber. Output is JSON unless `LP_LOG_FORMAT=text`.
pub fn init_tracing() {
    let log_format = std::env::var("LP_LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("text") {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    } else {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with_derivation(config, Arc::new(KeepStoredProgress)).await
}

/// Like [`build_state`], recomputing numeric and habit progress with `derivation`.
pub async fn build_state_with_derivation(
    config: &Config,
    derivation: Arc<dyn ProgressDerivation>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let goal_repo = Arc::new(GoalRepository::new(pool.clone(), writer.clone()));
    let goal_service: Arc<dyn GoalServiceTrait + Send + Sync> =
        Arc::new(GoalService::with_derivation(goal_repo, derivation));

    let schedule_repo = Arc::new(ScheduleRepository::new(pool.clone(), writer.clone()));
    let schedule_service: Arc<dyn ScheduleServiceTrait + Send + Sync> =
        Arc::new(ScheduleService::new(schedule_repo));

    let user_repo = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let user_service: Arc<dyn UserServiceTrait + Send + Sync> =
        Arc::new(UserService::new(user_repo));

    Ok(Arc::new(AppState {
        goal_service,
        schedule_service,
        user_service,
        auth: Arc::new(AuthManager::new(&config.auth)),
        db_path,
    }))
}
