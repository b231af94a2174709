//! Draining the diagnostic records of one ODBC handle.
//!
//! The driver never says up front how many records it holds. Records are
//! requested by 1-based index until the driver stops answering with data;
//! `SQL_NO_DATA` is the normal way that happens, any other failure code ends
//! the pass the same way.

use crate::buffer::BoundedBuf;
use crate::config::DiagOptions;
use crate::driver::{DiagField, DiagReturn, DiagSource, FieldLookup};
use crate::handle::*;
use crate::record::DiagnosticRecord;
use crate::report::DiagnosticReport;
use crate::types::*;
use std::fmt;
use tracing::{debug, trace};

/// Substituted when a name field cannot be retrieved, e.g. before the
/// connection is established.
pub const NONE: &str = "None";

/// Substituted when the driver returns an empty name, e.g. the server name of
/// an environment handle.
pub const NOT_APPLICABLE: &str = "Not applicable";

pub type EnvironmentDiagnostics<'h, D> = DiagnosticsCollector<'h, Environment, D>;
pub type ConnectionDiagnostics<'h, D> = DiagnosticsCollector<'h, Connection, D>;
pub type StatementDiagnostics<'h, D> = DiagnosticsCollector<'h, Statement, D>;
pub type DescriptorDiagnostics<'h, D> = DiagnosticsCollector<'h, Descriptor, D>;

/// Diagnostic records of a single handle, populated on construction.
///
/// The collector borrows the handle and never frees it. Call
/// [`collect`](Self::collect) again to pick up records the driver posted
/// after the last pass.
pub struct DiagnosticsCollector<'h, K: HandleKind, D: DiagSource> {
    handle: BorrowedHandle<'h, K>,
    driver: D,
    options: DiagOptions,
    records: Vec<DiagnosticRecord>,
    connection_name: BoundedBuf,
    server_name: BoundedBuf,
}

impl<'h, K: HandleKind, D: DiagSource> DiagnosticsCollector<'h, K, D> {
    pub fn new(handle: BorrowedHandle<'h, K>, driver: D) -> Self {
        Self::with_options(handle, driver, DiagOptions::default())
    }

    pub fn with_options(handle: BorrowedHandle<'h, K>, driver: D, options: DiagOptions) -> Self {
        let mut collector = Self {
            handle,
            driver,
            options,
            records: Vec::new(),
            connection_name: BoundedBuf::with_capacity(SQL_NAME_LENGTH),
            server_name: BoundedBuf::with_capacity(SQL_NAME_LENGTH),
        };
        collector.collect();
        collector
    }

    /// Runs one collection pass, replacing every record held so far.
    ///
    /// Connection and server name are only looked up when record 1 exists;
    /// a pass that finds no records leaves them as they were.
    pub fn collect(&mut self) -> &Self {
        if self.handle.is_null() {
            self.records.clear();
            return self;
        }

        self.reset();

        let handle_type = K::TYPE;
        let raw = self.handle.as_raw();
        let mut sql_state = BoundedBuf::with_capacity(SQL_STATE_SIZE);
        let mut message = BoundedBuf::with_capacity(self.options.message_capacity());
        let mut native_error: SQLINTEGER = 0;
        let mut rec_number: SQLSMALLINT = 1;

        let end = loop {
            let rc = self.driver.get_diag_rec(
                handle_type,
                raw,
                rec_number,
                sql_state.as_mut_slice(),
                &mut native_error,
                message.as_mut_slice(),
            );
            match DiagReturn::from(rc) {
                DiagReturn::Record => {}
                other => break other,
            }
            sql_state.seal();
            message.seal();

            if rec_number == 1 {
                lookup_name(
                    &self.driver,
                    handle_type,
                    raw,
                    DiagField::ConnectionName,
                    &mut self.connection_name,
                );
                lookup_name(
                    &self.driver,
                    handle_type,
                    raw,
                    DiagField::ServerName,
                    &mut self.server_name,
                );
            }

            trace!(
                %handle_type,
                rec_number,
                sql_state = %sql_state.to_string_lossy(),
                native_error,
                "diagnostic record"
            );
            self.records
                .push(DiagnosticRecord::from_buffers(&sql_state, native_error, &message));

            sql_state.clear();
            message.clear();
            native_error = 0;

            // Record numbers are SQLSMALLINT; nothing past this is addressable.
            if rec_number == SQLSMALLINT::MAX {
                break DiagReturn::Exhausted;
            }
            rec_number += 1;
        };

        match end {
            DiagReturn::Failed(code) => debug!(
                %handle_type,
                count = self.records.len(),
                code,
                "diagnostic pass ended on driver failure"
            ),
            _ => debug!(%handle_type, count = self.records.len(), "diagnostic pass complete"),
        }

        self
    }

    /// Drops the records. Connection and server name are kept.
    pub fn reset(&mut self) {
        self.records.clear();
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// # Panics
    ///
    /// If `index >= self.count()`.
    pub fn sql_state(&self, index: usize) -> String {
        self.record(index).sql_state()
    }

    /// # Panics
    ///
    /// If `index >= self.count()`.
    pub fn message(&self, index: usize) -> String {
        self.record(index).message()
    }

    /// # Panics
    ///
    /// If `index >= self.count()`.
    pub fn native_error(&self, index: usize) -> SQLINTEGER {
        self.record(index).native_error()
    }

    /// Connection name from the last pass that found a record: the driver's
    /// value, [`NONE`] or [`NOT_APPLICABLE`]. Empty until such a pass.
    pub fn connection_name(&self) -> String {
        self.connection_name.to_string_lossy().into_owned()
    }

    /// Server name, same rules as [`connection_name`](Self::connection_name).
    pub fn server_name(&self) -> String {
        self.server_name.to_string_lossy().into_owned()
    }

    pub fn get(&self, index: usize) -> Option<&DiagnosticRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[DiagnosticRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiagnosticRecord> {
        self.records.iter()
    }

    pub fn handle(&self) -> BorrowedHandle<'h, K> {
        self.handle
    }

    pub fn handle_type(&self) -> HandleType {
        K::TYPE
    }

    /// Owned snapshot of the current pass.
    pub fn report(&self) -> DiagnosticReport {
        DiagnosticReport::new(
            K::TYPE,
            self.connection_name(),
            self.server_name(),
            self.records.clone(),
        )
    }

    fn record(&self, index: usize) -> &DiagnosticRecord {
        assert!(
            index < self.records.len(),
            "diagnostic record index {} out of range (count {})",
            index,
            self.records.len()
        );
        &self.records[index]
    }
}

/// Best-effort lookup of a name field into `buf`; never fails the pass.
fn lookup_name<D: DiagSource>(
    driver: &D,
    handle_type: HandleType,
    handle: SQLHANDLE,
    field: DiagField,
    buf: &mut BoundedBuf,
) {
    buf.clear();
    let rc = driver.get_diag_field(handle_type, handle, 1, field, buf.as_mut_slice());
    match FieldLookup::from(rc) {
        FieldLookup::Retrieved => {
            buf.seal();
            if buf.is_empty() {
                debug!(%handle_type, ?field, "diagnostic field not applicable");
                buf.write_truncated(NOT_APPLICABLE.as_bytes());
            }
        }
        FieldLookup::Unavailable(code) => {
            debug!(%handle_type, ?field, code, "diagnostic field unavailable");
            buf.write_truncated(NONE.as_bytes());
        }
    }
}

impl<'a, K: HandleKind, D: DiagSource> IntoIterator for &'a DiagnosticsCollector<'_, K, D> {
    type Item = &'a DiagnosticRecord;
    type IntoIter = std::slice::Iter<'a, DiagnosticRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<K: HandleKind, D: DiagSource> fmt::Debug for DiagnosticsCollector<'_, K, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticsCollector")
            .field("handle", &self.handle)
            .field("connection_name", &self.connection_name.to_string_lossy())
            .field("server_name", &self.server_name.to_string_lossy())
            .field("records", &self.records)
            .finish()
    }
}
