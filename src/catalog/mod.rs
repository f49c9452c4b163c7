pub mod api;
mod error;

pub use api::CatalogClient;
pub use error::CatalogError;
