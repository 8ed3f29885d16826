pub mod http;

pub use crate::cache::Cache;
pub use http::HttpBackendSource;
