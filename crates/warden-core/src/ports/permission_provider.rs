use thiserror::Error;

use crate::domain::PermissionStatus;

#[derive(Error, Debug)]
pub enum PermissionError {
    #[error("unable to open the permission settings: {message}")]
    Redirect { message: String },
}

/// Platform capability check for usage access.
pub trait PermissionProvider: Send + Sync {
    fn status(&self) -> PermissionStatus;

    fn open_settings(&self) -> Result<(), PermissionError>;
}
