use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Listen address of the REST API (mounted under `/api`).
    pub rest_addr: String,
    /// Listen address of the mock GraphQL endpoint (`/graphql`).
    pub graphql_addr: String,
    /// Fixture file to seed the store with; the bundled one when unset.
    pub fixture_path: Option<PathBuf>,
    /// Username stamped as `raisedBy` on tickets created through GraphQL.
    pub demo_user: String,
    /// Non-final tickets older than this show up as overdue.
    pub overdue_after_hours: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let overdue_after_hours = match env::var("OVERDUE_AFTER_HOURS") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("OVERDUE_AFTER_HOURS must be a whole number: {e}"))?,
            Err(_) => 72,
        };

        Ok(Config {
            rest_addr: env::var("REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            graphql_addr: env::var("GRAPHQL_ADDR").unwrap_or_else(|_| "0.0.0.0:4000".to_string()),
            fixture_path: env::var("FIXTURE_PATH").ok().filter(|p| !p.is_empty()).map(PathBuf::from),
            demo_user: env::var("DEMO_USER").unwrap_or_else(|_| "jdoe".to_string()),
            overdue_after_hours,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rest_addr: "0.0.0.0:8000".to_string(),
            graphql_addr: "0.0.0.0:4000".to_string(),
            fixture_path: None,
            demo_user: "jdoe".to_string(),
            overdue_after_hours: 72,
        }
    }
}
