//! # print-label
//!
//! Label modelling and printer transport library.
//!
//! ## Scope
//!
//! - [`Label`]: dialect-agnostic layout (geometry + named fields)
//! - [`Dialect`]: turns a label into bytes ([`Json`] is built in)
//! - [`Connection`]: open/close/send over a stream, a file or TCP
//! - [`TransportConfig`]: serde-friendly transport selection
//!
//! Scheduling, discovery and retries stay in application code.
//!
//! ## Example
//!
//! ```no_run
//! use print_label::{Connection, Dialect, Json, Label, TcpConnection, Unit};
//!
//! let mut label = Label::new(50.0, 25.0, Unit::Millimeters);
//! label.create_field(2.0, 2.0, Some("title"))?;
//! label.create_field(2.0, 12.0, None)?; // "field-1"
//!
//! let data = Json::new().encode(&label)?;
//!
//! let mut printer = TcpConnection::from_addr("192.168.1.100:9100")?;
//! let mut session = printer.session()?;
//! session.send(&data)?;
//! session.finish()?;
//! # Ok::<(), print_label::PrintError>(())
//! ```

mod config;
mod connection;
mod dialect;
mod error;
mod job;
mod label;

// Re-exports
pub use config::TransportConfig;
pub use connection::{
    Connection, DEFAULT_PORT, FileConnection, Session, StreamConnection, TcpConnection,
    with_connection,
};
pub use dialect::{Dialect, Json, META_KEY};
pub use error::{PrintError, PrintResult};
pub use job::{PrintJob, print_label};
pub use label::{DEFAULT_FIELD_PREFIX, Field, Label, Unit};
