//! Proxy errors - hard aborts of the adoption protocol

use lendcore_core::Address;
use thiserror::Error;

/// Errors that abort an adoption or delegation call outright.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    #[error("only proxy admin can change implementation")]
    NotProxyAdmin,

    #[error("change not authorized")]
    ChangeNotAuthorized,

    #[error("storage layout of {implementation} is not an append-only extension of the active layout")]
    IncompatibleLayout { implementation: Address },

    #[error("no implementation is active")]
    NoImplementation,
}
