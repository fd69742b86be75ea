//! Chat-log repository: persistence and queries for logged turns.

use crate::error::ChatLogError;
use crate::pool::SqlitePoolManager;
use assistant_core::Turn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

/// One logged turn as read back from the database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggedTurn {
    pub id: String,
    pub session_id: String,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Repository over the `chat_log` table.
#[derive(Clone, Debug)]
pub struct ChatLogRepository {
    pool_manager: SqlitePoolManager,
}

impl ChatLogRepository {
    pub async fn new(database_url: &str) -> Result<Self, ChatLogError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), ChatLogError> {
        info!("Creating chat_log table if not exists");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_log (
                id TEXT PRIMARY KEY,
                session_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_chat_log_session_id ON chat_log(session_id);
            CREATE INDEX IF NOT EXISTS idx_chat_log_created_at ON chat_log(created_at);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Logs one turn for the session.
    pub async fn log_turn(&self, session_id: &str, turn: &Turn) -> Result<(), ChatLogError> {
        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            INSERT INTO chat_log (id, session_id, role, content, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(session_id)
        .bind(turn.role.as_str())
        .bind(&turn.content)
        .bind(turn.timestamp)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Logs the user/assistant pair of one completed request, user first.
    pub async fn log_pair(
        &self,
        session_id: &str,
        user: &Turn,
        assistant: &Turn,
    ) -> Result<(), ChatLogError> {
        self.log_turn(session_id, user).await?;
        self.log_turn(session_id, assistant).await?;
        info!(session_id = %session_id, "logged turn pair");
        Ok(())
    }

    /// The most recent `limit` turns of a session, oldest first.
    pub async fn history(
        &self,
        session_id: &str,
        limit: i64,
    ) -> Result<Vec<LoggedTurn>, ChatLogError> {
        let pool = self.pool_manager.pool();

        let mut rows: Vec<LoggedTurn> = sqlx::query_as::<_, (String, String, String, String, DateTime<Utc>)>(
            r#"
            SELECT id, session_id, role, content, created_at
            FROM chat_log
            WHERE session_id = ?
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(|(id, session_id, role, content, created_at)| LoggedTurn {
            id,
            session_id,
            role,
            content,
            created_at,
        })
        .collect();

        rows.reverse();
        Ok(rows)
    }

    /// Distinct session ids present in the log, most recently active first.
    pub async fn sessions(&self) -> Result<Vec<String>, ChatLogError> {
        let pool = self.pool_manager.pool();

        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT session_id
            FROM chat_log
            GROUP BY session_id
            ORDER BY MAX(created_at) DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(session_id,)| session_id).collect())
    }
}
