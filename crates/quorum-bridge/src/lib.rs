//! Cross-ledger bridge: atomic transfer coordination over independent
//! ledgers.
//!
//! The bridge moves value with a lock → confirm → settle protocol:
//! bounded-duration source-side locking, explicit rollback from the
//! pre-confirmation states, timed expiry of orphaned locks, and a
//! settlement proof for audit. Every lifecycle operation is journaled
//! and audited; ledger calls run under a configured RPC deadline.

pub mod connector;
pub mod coordinator;
pub mod error;
pub mod fees;
pub mod lifecycle;

pub use connector::{AuditSink, LedgerConnector, LedgerFault, MemoryAuditSink};
pub use coordinator::{BridgeConfig, BridgeCoordinator, LockOutcome, SharedJournal};
pub use error::BridgeError;
pub use fees::{compute_bridge_fee, net_bridge_exposure};
pub use lifecycle::{sweep_expired, validate_bridge_chain};
