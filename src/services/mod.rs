//! Workflows layered on top of the transport and the list controllers.

use thiserror::Error;

use crate::api::errors::ApiError;
use crate::controller::errors::ControllerError;
use crate::forms::FormError;
use crate::session::SessionError;

pub mod auth;
pub mod notify;
pub mod screen;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("Type constraint violation: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Controller(#[from] ControllerError),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("{0}")]
    Rejected(String),

    #[error("Unexpected response: {0}")]
    Unexpected(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
