//! Failure modes shared by every document-store repository port.

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Errors raised by document-store adapters.
    pub enum DocumentStoreError {
        /// The store could not be reached or timed out.
        Connection { message: String } =>
            "document store connection failed: {message}",
        /// The store rejected or failed a request.
        Query { message: String } =>
            "document store query failed: {message}",
        /// A stored document could not be decoded into a domain type.
        Decode { message: String } =>
            "document store returned an unreadable document: {message}",
    }
}

impl From<DocumentStoreError> for Error {
    fn from(error: DocumentStoreError) -> Self {
        match error {
            DocumentStoreError::Connection { message } => {
                Error::service_unavailable(format!("document store unavailable: {message}"))
            }
            DocumentStoreError::Query { message } => {
                Error::internal(format!("document store error: {message}"))
            }
            DocumentStoreError::Decode { message } => {
                Error::internal(format!("document store decode failed: {message}"))
            }
        }
    }
}
