#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, OutputFormat};
pub use lambda::LambdaConfig;
pub use toml_config::FileConfig;

pub const DEFAULT_UPSTREAM_ENDPOINT: &str = "http://universities.hipolabs.com/search";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
/// 比上游逾時長，讓代理函式有機會先回傳降級結果
pub const DEFAULT_CLIENT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 300;

pub fn default_user_agent() -> String {
    format!("uni-explorer/{}", env!("CARGO_PKG_VERSION"))
}
