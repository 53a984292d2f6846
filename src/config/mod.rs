mod schema;

pub use schema::Config;

/// Overrides `dispatch.python`.
pub const PYTHON_ENV: &str = "DJANGO_CMD_PYTHON";

/// Overrides `log.level`, using tracing's EnvFilter syntax.
pub const LOG_ENV: &str = "DJANGO_CMD_LOG";
