//! Lendcore Proxy - the upgradeable shell
//!
//! The proxy owns the protocol's identity and storage while the logic it
//! delegates to can be swapped. Correctness across swaps hinges on one
//! rule: an implementation's storage layout may only ever grow by
//! appending fields. This crate holds the shell state machine (two-step
//! admin transfer, two-step implementation adoption) and the layout
//! compatibility check enforced at adoption time.

mod error;
mod events;
mod schema;
mod shell;

pub use error::ProxyError;
pub use events::ProxyEvent;
pub use schema::{FieldDef, StorageLayout};
pub use shell::ProxyShell;
