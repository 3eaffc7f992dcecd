#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` carries the diagnostics plumbing shared by the enumeration
//! crates and the `fsenum` binary. Library code emits events through the
//! target macros exported here; the binary installs a subscriber once at
//! startup.
//!
//! # Design
//!
//! - [`trace_enum!`], [`trace_handle!`], [`trace_buffer!`] and
//!   [`trace_pattern!`] wrap `tracing` macros with fixed `fsenum::*` targets.
//! - [`LogConfig`] turns a `-v` count into a filter directive.
//! - [`init_tracing`] installs a stderr subscriber, honouring the
//!   [`LOG_ENV`] override.
//!
//! # See also
//!
//! - `tracing_subscriber::EnvFilter` for the directive syntax accepted by
//!   `FSENUM_LOG`.

mod config;
mod subscriber;
pub mod tracing_macros;

pub use config::{LOG_ENV, LogConfig};
pub use subscriber::{build_filter, init_tracing};
