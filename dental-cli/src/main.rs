//! dental-assistant: entry point. Wires session memory, the tool registry,
//! the OpenAI reasoning step, and the chat log into the orchestrator, and
//! exposes one-shot and REPL chat plus session maintenance commands.

use anyhow::{Context, Result};
use assistant_core::{init_tracing, Turn};
use chat_log::ChatLogRepository;
use clap::{Parser, Subcommand};
use oracle_client::{OpenAiOracle, OracleConfig};
use orchestrator::{DomainPolicy, Orchestrator, OrchestratorConfig};
use session_memory::WindowMemory;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tool_registry::{SqlQueryTool, ToolRegistry, WebSearchTool};
use tracing::info;

#[derive(Parser)]
#[command(name = "dental-assistant", about = "Dental clinic assistant over SQL and web search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask one question and print the answer.
    Ask {
        /// Session id the question belongs to.
        #[arg(long, default_value = "default")]
        session: String,
        /// The question.
        message: String,
    },
    /// Interactive chat. `/clear` resets the session, `/quit` exits.
    Chat {
        #[arg(long, default_value = "default")]
        session: String,
    },
    /// Clear a session's conversation window.
    Clear {
        #[arg(long, default_value = "default")]
        session: String,
    },
    /// Print a session's logged history.
    History {
        #[arg(long, default_value = "default")]
        session: String,
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
}

/// Everything a chat request needs, built once at startup.
struct App {
    engine: Orchestrator,
    log: ChatLogRepository,
}

impl App {
    /// Builds the full stack from the environment. Missing credentials are
    /// startup-fatal: the process exits before accepting any input.
    async fn from_env() -> Result<Self> {
        let oracle_config = OracleConfig::from_env()?;
        let oracle = Arc::new(OpenAiOracle::new(oracle_config));

        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL not set (Postgres connection for the sql_query tool)")?;
        let tavily_api_key = std::env::var("TAVILY_API_KEY")
            .context("TAVILY_API_KEY not set (key for the web_search tool)")?;

        let registry = ToolRegistry::new()
            .register(Arc::new(
                SqlQueryTool::connect_lazy(&database_url)
                    .context("invalid DATABASE_URL")?,
            ))
            .register(Arc::new(WebSearchTool::new(tavily_api_key)));

        let window_size = env_usize("WINDOW_SIZE", 10);
        let memory = Arc::new(WindowMemory::new(window_size));

        let policy = match std::env::var("REFUSAL_MESSAGE") {
            Ok(text) if !text.trim().is_empty() => DomainPolicy::with_refusal(text),
            _ => DomainPolicy::default(),
        };

        let config = OrchestratorConfig {
            max_iterations: env_usize("MAX_ITERATIONS", 8),
            oracle_timeout: Duration::from_secs(env_u64("ORACLE_TIMEOUT_SECS", 60)),
            tool_timeout: Duration::from_secs(env_u64("TOOL_TIMEOUT_SECS", 30)),
        };

        let engine = Orchestrator::new(memory, Arc::new(registry), oracle, policy, config);

        let chat_log_db =
            std::env::var("CHAT_LOG_DB").unwrap_or_else(|_| "chat_log.db".to_string());
        let log = ChatLogRepository::new(&chat_log_db)
            .await
            .context("failed to open the chat log database")?;

        info!(window_size, "assistant ready");
        Ok(Self { engine, log })
    }

    /// One request: answer, then write the pair to the audit log. A logging
    /// failure is reported but does not fail the request; the answer already
    /// exists.
    async fn answer(&self, session: &str, message: &str) -> Result<String> {
        let answer = self.engine.handle(session, message).await?;
        if let Err(e) = self
            .log
            .log_pair(session, &Turn::user(message), &Turn::assistant(answer.as_str()))
            .await
        {
            tracing::warn!(error = %e, "failed to write chat log");
        }
        Ok(answer)
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

async fn run_repl(app: &App, session: &str) -> Result<()> {
    println!("dental-assistant — session '{session}'. /clear resets, /quit exits.");
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" => break,
            "/clear" => {
                app.engine.clear_session(session).await;
                println!("session cleared");
            }
            message => match app.answer(session, message).await {
                Ok(answer) => println!("{answer}"),
                Err(e) => eprintln!("error: {e}"),
            },
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("dental-assistant.log")?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Ask { session, message } => {
            let app = App::from_env().await?;
            let answer = app.answer(&session, &message).await?;
            println!("{answer}");
        }
        Commands::Chat { session } => {
            let app = App::from_env().await?;
            run_repl(&app, &session).await?;
        }
        Commands::Clear { session } => {
            let app = App::from_env().await?;
            app.engine.clear_session(&session).await;
            println!("session '{session}' cleared");
        }
        Commands::History { session, limit } => {
            let app = App::from_env().await?;
            for turn in app.log.history(&session, limit).await? {
                println!(
                    "[{}] {}: {}",
                    turn.created_at.format("%Y-%m-%d %H:%M:%S"),
                    turn.role,
                    turn.content
                );
            }
        }
    }
    Ok(())
}
