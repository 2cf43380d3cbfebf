//! Core application

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::data::SearchSqlBuilder;
use crate::data::query::{catalog, parse_filters};
use crate::utils::file::read_inline_or_file;

pub struct CoreApp {
    pub config: AppConfig,
    pub builder: SearchSqlBuilder,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::new(AppConfig::load(&cli_config)?);
        let output = app.execute(&command)?;
        println!("{}", output);
        Ok(())
    }

    pub fn new(config: AppConfig) -> Self {
        let builder = config.sql_builder();
        Self { config, builder }
    }

    /// Execute a command and return its JSON output
    pub fn execute(&self, command: &Commands) -> Result<String> {
        match command {
            Commands::Distinct { column, filters } => {
                let filters = parse_filters(&read_inline_or_file(filters)?)?;
                let stmt = self.builder.build_distinct_values_sql(&filters, column)?;
                tracing::debug!(
                    column = %column,
                    params = stmt.params.len(),
                    "Compiled distinct query"
                );
                to_json(&stmt)
            }
            Commands::Search { page, filters } => {
                let filters = parse_filters(&read_inline_or_file(filters)?)?;
                let stmt = self
                    .builder
                    .build_search_sql_for_web_filters(&filters, *page)?;
                tracing::debug!(
                    page,
                    rows_per_page = self.builder.rows_per_page(),
                    params = stmt.params.len(),
                    "Compiled search query"
                );
                to_json(&stmt)
            }
            Commands::Columns => to_json(catalog::all()),
        }
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        // stdout carries the compiled statement
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::QueryConfig;
    use crate::data::QueryError;

    fn app(rows_per_page: u32) -> CoreApp {
        CoreApp::new(AppConfig {
            query: QueryConfig { rows_per_page },
        })
    }

    const FILTERS: &str = r#"{
        "category": [{"op": "eq", "value": "KITES"}],
        "country": [{"op": "eq", "value": "UK"}]
    }"#;

    #[test]
    fn test_execute_search() {
        let out = app(10)
            .execute(&Commands::Search {
                page: 1,
                filters: FILTERS.to_string(),
            })
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();

        let sql = json["sql"].as_str().unwrap();
        assert!(sql.ends_with("limit ? offset ?"));
        let params = json["params"].as_array().unwrap();
        assert_eq!(params.len(), 4);
        assert_eq!(params[2], 11);
        assert_eq!(params[3], 10);
    }

    #[test]
    fn test_execute_distinct() {
        let out = app(20)
            .execute(&Commands::Distinct {
                column: "brand".to_string(),
                filters: FILTERS.to_string(),
            })
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();

        let sql = json["sql"].as_str().unwrap();
        assert!(sql.starts_with("select distinct p.brand from products p"));
        assert!(!sql.contains("product_attributes"));
        assert!(sql.contains("brand <> 'unknown'"));
        assert_eq!(json["params"], serde_json::json!(["KITES", "UK"]));
    }

    #[test]
    fn test_execute_columns() {
        let out = app(20).execute(&Commands::Columns).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        let columns = json.as_array().unwrap();
        assert_eq!(columns.len(), 10);
        assert_eq!(columns[0]["name"], "category");
    }

    #[test]
    fn test_execute_reports_query_error() {
        let err = app(20)
            .execute(&Commands::Distinct {
                column: "colour".to_string(),
                filters: FILTERS.to_string(),
            })
            .unwrap_err();
        let query_err = err.downcast_ref::<QueryError>().unwrap();
        assert_eq!(query_err.code(), "UNKNOWN_COLUMN");
    }

    #[test]
    fn test_execute_filters_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filters.json");
        std::fs::write(&path, r#"{"category":[{"op":"eq","value":"KITES"}]}"#).unwrap();

        let err = app(20)
            .execute(&Commands::Search {
                page: 0,
                filters: format!("@{}", path.display()),
            })
            .unwrap_err();
        let query_err = err.downcast_ref::<QueryError>().unwrap();
        assert_eq!(query_err.code(), "MISSING_MANDATORY_FILTER");
    }
}
