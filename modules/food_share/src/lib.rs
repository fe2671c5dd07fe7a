// === PUBLIC CONTRACT ===
// Only the contract module should be public for other crates to consume
pub mod contract;

// Re-export the public contract components
pub use contract::{client, error, model};

// === MODULE DEFINITION ===
pub mod module;
pub use module::FoodShare;

// === INTERNAL MODULES ===
// Exposed for the CLI and for integration tests. Prefer `contract` for
// anything that should stay stable.
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
