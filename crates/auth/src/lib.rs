//! `procureflow-auth` — identity and capability checks.
//!
//! This crate is intentionally decoupled from HTTP and storage. The transport
//! layer resolves whatever credentials it accepts into an [`Actor`], and every
//! lifecycle operation receives that actor explicitly — never ambient state.

pub mod actor;
pub mod role;

pub use actor::Actor;
pub use role::Role;
