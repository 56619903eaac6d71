use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_LOG_FILTER: &str = "todo_app=debug,actix_web=info,actix_server=info";

lazy_static::lazy_static! {
    pub static ref DATABASE_URL: String =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| String::from("todo.db"));

    pub static ref API_URL: String =
        std::env::var("API_URL").unwrap_or_else(|_| String::from("localhost:5900"));

    pub static ref API_WORKERS: usize = std::env::var("API_WORKERS")
        .ok()
        .and_then(|workers| workers.parse().ok())
        .unwrap_or(1);
}

/// Client side settings stored at `~/todo/config.json`
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TodoConfig {
    pub api_url: Option<String>,
}

impl TodoConfig {
    pub fn path() -> Option<PathBuf> {
        let mut path = dirs::home_dir()?;
        path.push("todo");
        path.push("config.json");
        Some(path)
    }

    /// Reads the config file, falling back to defaults when it is missing or unreadable
    pub fn load() -> TodoConfig {
        let Some(path) = TodoConfig::path() else {
            return TodoConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => TodoConfig::parse(&contents).unwrap_or_else(|e| {
                log::warn!("Ignoring invalid config at {}: {}", path.display(), e);
                TodoConfig::default()
            }),
            Err(_) => TodoConfig::default(),
        }
    }

    pub fn parse(contents: &str) -> Result<TodoConfig, serde_json::Error> {
        serde_json::from_str(contents)
    }

    /// Host and port the client talks to
    pub fn api_url(&self) -> String {
        self.api_url.clone().unwrap_or_else(|| API_URL.clone())
    }
}

/// Initializes `env_logger`, keeping any filter already set through `RUST_LOG`
pub fn init_logger() {
    let env = env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER);

    let _ = env_logger::Builder::from_env(env).try_init();
}
