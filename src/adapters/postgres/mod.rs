//! PostgreSQL adapters for the persistence gateway ports.

mod chat_message_repository;
mod chat_session_repository;
mod key_result_repository;
mod objective_repository;
mod progress_history_repository;

pub use chat_message_repository::PostgresChatMessageRepository;
pub use chat_session_repository::PostgresChatSessionRepository;
pub use key_result_repository::PostgresKeyResultRepository;
pub use objective_repository::PostgresObjectiveRepository;
pub use progress_history_repository::PostgresProgressHistoryRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::ports::StoreError;

/// Builds the connection pool and, when configured, runs pending migrations.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.url)
        .await
        .map_err(|e| StoreError::database(format!("Failed to connect: {}", e)))?;

    if config.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::database(format!("Migration failed: {}", e)))?;
    }

    Ok(pool)
}
