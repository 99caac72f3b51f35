//! Invocation of the `gluster` command surface.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                      GlusterCli                      │
//! │  Query ──► args + --xml ──► CommandRunner            │
//! │                                 │                    │
//! │                      xml::normalize (generic doc)    │
//! │                                 │                    │
//! │                      schema::decode_* (typed record) │
//! └─────────────────────────────────┬────────────────────┘
//!                                   │
//!                   ┌───────────────┴───────────────┐
//!            ┌──────▼──────┐                 ┌──────▼──────┐
//!            │ SystemRunner│                 │   MockCli   │
//!            │ (processes) │                 │  (testing)  │
//!            └─────────────┘                 └─────────────┘
//! ```

pub mod mock;
mod query;
mod runner;
pub mod scenarios;

pub use mock::MockCli;
pub use query::{GlusterCli, Query, QueryError, XML_FLAG};
pub use runner::{CommandError, CommandOutput, CommandRunner, DEFAULT_TIMEOUT, SystemRunner};
