use thiserror::Error;
use uuid::Uuid;

use crate::{
    db::waitlistdb::StoreError,
    error::{ErrorMessage, HttpError},
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("This email is already on our waitlist!")]
    DuplicateEmail,

    #[error("Waitlist entry {0} not found")]
    EntryNotFound(Uuid),

    #[error("Referral count for {entry_id} could not be updated after {attempts} attempts")]
    CounterContention { entry_id: Uuid, attempts: u32 },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::DuplicateEmail => HttpError::conflict(ErrorMessage::EmailExist.to_string()),

            ServiceError::EntryNotFound(_) => HttpError::not_found(ErrorMessage::EntryNotFound.to_string()),

            ServiceError::CounterContention { .. } | ServiceError::Store(_) => {
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
        }
    }
}
