use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "BEAUTYSCAN_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Install the stderr log subscriber. Filter precedence: `--log-level`,
/// then `BEAUTYSCAN_LOG` (from the environment or `.env`), then `warn`.
pub fn init(log_level: Option<&str>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    let env_filter = match log_level {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|e| format!("invalid log filter '{level}': {e}"))?,
        None => match EnvFilter::try_from_env(LOG_ENV) {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new(DEFAULT_FILTER),
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
}
