pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, OutputFormat};
pub use config::{FileConfig, LambdaConfig};

pub use adapters::{HipolabsClient, ProxyHttpClient};
pub use core::{
    orchestrator::SearchOrchestrator,
    page::{Command, Dispatch, PageController, PageState},
    proxy::{ProxyFunction, ProxyRequest, ProxyResponse},
};
pub use domain::model::{SearchQuery, SearchResult, UniversityRecord};
pub use utils::error::{ExplorerError, Result, SearchError};
