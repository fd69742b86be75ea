//! Integration tests for [`ChatLogRepository`] against a temporary SQLite
//! file.
//!
//! **BDD style**: each test documents scenario and expected outcome.

use assistant_core::Turn;
use chat_log::{ChatLogError, ChatLogRepository};
use tempfile::TempDir;

async fn repo_in(dir: &TempDir) -> ChatLogRepository {
    let path = dir.path().join("chat_log.db");
    ChatLogRepository::new(path.to_str().unwrap())
        .await
        .expect("repository should initialize")
}

/// **Test: a logged pair reads back in order, user first.**
#[tokio::test]
async fn logged_pair_reads_back_in_order() {
    let dir = TempDir::new().unwrap();
    let repo = repo_in(&dir).await;

    repo.log_pair("s1", &Turn::user("question"), &Turn::assistant("answer"))
        .await
        .unwrap();

    let history = repo.history("s1", 10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, "user");
    assert_eq!(history[0].content, "question");
    assert_eq!(history[1].role, "assistant");
    assert_eq!(history[1].content, "answer");
}

/// **Test: history is scoped to the requested session.**
#[tokio::test]
async fn history_is_per_session() {
    let dir = TempDir::new().unwrap();
    let repo = repo_in(&dir).await;

    repo.log_pair("alice", &Turn::user("qa"), &Turn::assistant("aa"))
        .await
        .unwrap();
    repo.log_pair("bob", &Turn::user("qb"), &Turn::assistant("ab"))
        .await
        .unwrap();

    let alice = repo.history("alice", 10).await.unwrap();
    assert_eq!(alice.len(), 2);
    assert!(alice.iter().all(|t| t.session_id == "alice"));

    let unknown = repo.history("carol", 10).await.unwrap();
    assert!(unknown.is_empty());
}

/// **Test: the limit keeps only the most recent turns, still oldest first.**
#[tokio::test]
async fn history_limit_keeps_most_recent() {
    let dir = TempDir::new().unwrap();
    let repo = repo_in(&dir).await;

    for i in 1..=3 {
        repo.log_pair(
            "s1",
            &Turn::user(format!("q{i}")),
            &Turn::assistant(format!("a{i}")),
        )
        .await
        .unwrap();
    }

    let history = repo.history("s1", 2).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content, "q3");
    assert_eq!(history[1].content, "a3");
}

/// **Test: an unusable database path surfaces as the crate's own database
/// error, not a raw driver type.**
#[tokio::test]
async fn unusable_database_path_is_a_chat_log_error() {
    let err = ChatLogRepository::new("/no-such-directory/deeper/chat_log.db")
        .await
        .unwrap_err();
    assert!(matches!(err, ChatLogError::Database(_)));
    assert!(err.to_string().starts_with("database error"));
}

/// **Test: sessions() lists every session that ever logged a turn.**
#[tokio::test]
async fn sessions_lists_known_sessions() {
    let dir = TempDir::new().unwrap();
    let repo = repo_in(&dir).await;

    repo.log_pair("alice", &Turn::user("q"), &Turn::assistant("a"))
        .await
        .unwrap();
    repo.log_pair("bob", &Turn::user("q"), &Turn::assistant("a"))
        .await
        .unwrap();

    let mut sessions = repo.sessions().await.unwrap();
    sessions.sort();
    assert_eq!(sessions, vec!["alice", "bob"]);
}
