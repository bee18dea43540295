//! Proxy events
//!
//! Emitted for external indexers; soft failures surface here as a
//! `Failure` event carrying the (error, info) pair in addition to the
//! returned code.

use lendcore_core::{Address, ErrorCode, FailureInfo};
use serde::{Deserialize, Serialize};

/// Events emitted by the proxy shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum ProxyEvent {
    NewPendingImplementation {
        old_pending: Address,
        new_pending: Address,
    },
    NewImplementation {
        old_implementation: Address,
        new_implementation: Address,
    },
    NewPendingAdmin {
        old_pending: Address,
        new_pending: Address,
    },
    NewAdmin {
        old_admin: Address,
        new_admin: Address,
    },
    Failure {
        error: ErrorCode,
        info: FailureInfo,
    },
}
