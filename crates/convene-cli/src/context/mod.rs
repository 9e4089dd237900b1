mod app_context;
mod config_warnings;
mod guard;

pub use app_context::AppContext;
pub use config_warnings::warn_unconfigured;
pub use guard::require_session;
