use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("layered cache operation failed: {0}")]
    Cache(#[from] llmcache_cache::CacheError),
}

pub type Result<T> = std::result::Result<T, ManagerError>;
