//! Reads the diagnostic records an ODBC driver posts on a handle.
//!
//! A [`DiagnosticsCollector`] borrows an environment, connection, statement
//! or descriptor handle and drains its records through a [`DiagSource`],
//! normally the system driver manager ([`OdbcDriver`], feature `odbc-ffi`).
//!
//! ```ignore
//! let handle = unsafe { BorrowedHandle::<Statement>::from_raw(hstmt) };
//! let diagnostics = StatementDiagnostics::new(handle, OdbcDriver);
//! for rec in &diagnostics {
//!     eprintln!("[{}] {} ({})", rec.sql_state(), rec.message(), rec.native_error());
//! }
//! ```

mod buffer;
mod collector;
mod config;
mod driver;
mod error;
#[cfg(feature = "odbc-ffi")]
mod ffi;
mod handle;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
mod record;
mod report;
pub mod types;

pub use buffer::BoundedBuf;
pub use collector::{
    ConnectionDiagnostics, DescriptorDiagnostics, DiagnosticsCollector, EnvironmentDiagnostics,
    StatementDiagnostics, NONE, NOT_APPLICABLE,
};
pub use config::DiagOptions;
pub use driver::{DiagField, DiagReturn, DiagSource, FieldLookup};
pub use error::{check_return, OdbcError};
#[cfg(feature = "odbc-ffi")]
pub use ffi::OdbcDriver;
pub use handle::{
    BorrowedHandle, Connection, Descriptor, Environment, HandleKind, HandleType, Statement,
};
pub use record::DiagnosticRecord;
pub use report::DiagnosticReport;
