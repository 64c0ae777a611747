pub mod carousel;
pub mod orchestrator;
pub mod page;
pub mod proxy;
pub mod render;

pub use crate::domain::model::{SearchQuery, SearchResult, UniversityRecord};
pub use crate::domain::ports::{ConfigProvider, DirectoryClient, ProxyReply, UniversitySource};
pub use crate::utils::error::Result;
