//! Matching core
//!
//! Transport-free heart of the matching and messaging service:
//!
//! - presence directory: who is reachable right now, and on which
//!   connection
//! - candidate discovery with a per-user snapshot cache invalidated one
//!   candidate at a time
//! - swipe state machine promoting reciprocated interest to a mutual
//!   match
//! - message router delivering live or deferring a pending-notification
//!   marker
//!
//! Store access goes through the seams in [`store`]; handles are built
//! once and injected, so every component runs unchanged against Redis
//! and the profile service in production or the [`memory`] backends in
//! tests.
//!
//! **Consistency model:** best effort, not linearizable. Cross-record
//! writes (match promotion, account cleanup) are sequenced without a
//! transaction, and concurrent decisions can race; both windows are
//! accepted rather than masked.

pub mod discovery;
pub mod memory;
pub mod presence;
pub mod router;
pub mod store;
pub mod swipe;

pub use discovery::{CandidateDiscovery, DISCOVERY_LIMIT};
pub use presence::PresenceDirectory;
pub use router::{LiveDelivery, MessageRouter};
pub use swipe::SwipeEngine;
