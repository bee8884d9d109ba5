//! Probing engine: block framing, the handshake session run against one
//! target, the coordinator that fans sessions out over a target list, and the
//! loader that turns target list files into [`Target`]s.
//!
//! [`Target`]: portcheck_common::network::target::Target

pub mod coordinator;
pub mod loader;
pub mod message;
pub mod mllp;
pub mod network;
pub mod session;
