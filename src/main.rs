use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use clarion_core::{resolve_rule_set, utc_offset_from_env_value, ContentAnalyser, CoreConfig};

const DEFAULT_ANALYSIS_TIMEOUT_MS: u64 = 5000;

/// Main entry point for Clarion
///
/// Resolves configuration once, then serves the REST API.
///
/// # Environment Variables
/// - `CLARION_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `CLARION_RULESET_PATH`: alternative rule-set YAML file (default: built-in rule set)
/// - `CLARION_UTC_OFFSET`: practice time zone, e.g. "+10:00" (default: "+10:00")
/// - `CLARION_ANALYSIS_TIMEOUT_MS`: upper bound on one analysis (default: 5000)
/// - `CLARION_API_KEY`: when set, `POST /analyse` requires a matching `x-api-key` header
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the rule set or any configuration value is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clarion=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("CLARION_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let ruleset_override = std::env::var("CLARION_RULESET_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);
    let rules = resolve_rule_set(ruleset_override)?;
    let utc_offset = utc_offset_from_env_value(std::env::var("CLARION_UTC_OFFSET").ok())?;
    let timeout =
        analysis_timeout_from_env_value(std::env::var("CLARION_ANALYSIS_TIMEOUT_MS").ok())?;
    let api_key = std::env::var("CLARION_API_KEY")
        .ok()
        .filter(|v| !v.trim().is_empty());

    tracing::info!(
        version = rules.version(),
        offset = %utc_offset,
        timeout_ms = timeout.as_millis() as u64,
        api_key = api_key.is_some(),
        "++ Rule set loaded"
    );

    let cfg = Arc::new(CoreConfig::new(rules, utc_offset));
    let app = api_rest::router(AppState {
        analyser: ContentAnalyser::new(cfg),
        timeout,
        api_key,
    });

    tracing::info!("++ Starting Clarion REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Parse the analysis timeout in milliseconds. Unset or blank means the default.
fn analysis_timeout_from_env_value(value: Option<String>) -> anyhow::Result<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let ms = match value {
        Some(v) => v
            .parse::<u64>()
            .map_err(|e| anyhow::anyhow!("invalid CLARION_ANALYSIS_TIMEOUT_MS '{v}': {e}"))?,
        None => DEFAULT_ANALYSIS_TIMEOUT_MS,
    };
    if ms == 0 {
        anyhow::bail!("CLARION_ANALYSIS_TIMEOUT_MS must be greater than zero");
    }
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_defaults_and_parses() {
        assert_eq!(
            analysis_timeout_from_env_value(None).expect("default"),
            Duration::from_millis(5000)
        );
        assert_eq!(
            analysis_timeout_from_env_value(Some(" 250 ".into())).expect("valid"),
            Duration::from_millis(250)
        );
        assert!(analysis_timeout_from_env_value(Some("0".into())).is_err());
        assert!(analysis_timeout_from_env_value(Some("soon".into())).is_err());
    }
}
