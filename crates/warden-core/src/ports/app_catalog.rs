use thiserror::Error;

use crate::domain::CatalogEntry;

#[derive(Error, Debug)]
pub enum AppCatalogError {
    #[error("unable to enumerate installed applications: {message}")]
    Io { message: String },
}

pub trait AppCatalog: Send + Sync {
    fn entries(&self) -> Result<Vec<CatalogEntry>, AppCatalogError>;
}
