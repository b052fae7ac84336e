pub mod ports;
pub mod error;
pub mod memory;
pub mod watermark;   // "Where did we stop" lookup
pub mod pipeline;    // merge / filter / sort
pub mod persister;   // idempotent writes
pub mod service;     // orchestrator

#[cfg(test)]
mod testing;


pub use error::{DiscoveryError, SourceError, StoreError};
pub use memory::InMemoryTokenStore;
pub use ports::{TokenSourcePort, TokenStore};
pub use service::{DiscoveryConfig, PollReport, SourceOutcome, SourceReport, TokenDiscoveryService};
