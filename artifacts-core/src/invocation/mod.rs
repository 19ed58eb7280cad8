//! Delegation to vcpkg-ce.
//!
//! - `protocol`: Private flags understood by the pinned vcpkg-ce
//! - `builder`: Command line and scratch file assembly

pub mod builder;
pub mod protocol;

pub use builder::{IdGenerator, Invocation, InvocationBuilder, UuidGenerator};
pub use protocol::{CoordinationArgs, PROTOCOL_REVISION};
