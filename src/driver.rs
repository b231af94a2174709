//! The two driver-manager calls diagnostics are read through.
//!
//! Implementations write into caller-owned byte slices the same way
//! `SQLGetDiagRec` and `SQLGetDiagField` write into `SQLCHAR*` buffers: the
//! slice length is the `BufferLength` argument, and strings are zero
//! terminated inside it.

use crate::handle::HandleType;
use crate::types::*;

/// String-valued diagnostic fields the collector asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagField {
    ConnectionName,
    ServerName,
}

impl DiagField {
    pub const fn as_raw(self) -> SQLSMALLINT {
        match self {
            DiagField::ConnectionName => SQL_DIAG_CONNECTION_NAME,
            DiagField::ServerName => SQL_DIAG_SERVER_NAME,
        }
    }
}

pub trait DiagSource {
    /// `SQLGetDiagRec`. `sql_state` is at least `SQL_STATE_SIZE` bytes.
    fn get_diag_rec(
        &self,
        handle_type: HandleType,
        handle: SQLHANDLE,
        rec_number: SQLSMALLINT,
        sql_state: &mut [u8],
        native_error: &mut SQLINTEGER,
        message_text: &mut [u8],
    ) -> SQLRETURN;

    /// `SQLGetDiagField` for a string-valued field.
    fn get_diag_field(
        &self,
        handle_type: HandleType,
        handle: SQLHANDLE,
        rec_number: SQLSMALLINT,
        field: DiagField,
        diag_info: &mut [u8],
    ) -> SQLRETURN;
}

impl<D: DiagSource + ?Sized> DiagSource for &D {
    fn get_diag_rec(
        &self,
        handle_type: HandleType,
        handle: SQLHANDLE,
        rec_number: SQLSMALLINT,
        sql_state: &mut [u8],
        native_error: &mut SQLINTEGER,
        message_text: &mut [u8],
    ) -> SQLRETURN {
        (**self).get_diag_rec(
            handle_type,
            handle,
            rec_number,
            sql_state,
            native_error,
            message_text,
        )
    }

    fn get_diag_field(
        &self,
        handle_type: HandleType,
        handle: SQLHANDLE,
        rec_number: SQLSMALLINT,
        field: DiagField,
        diag_info: &mut [u8],
    ) -> SQLRETURN {
        (**self).get_diag_field(handle_type, handle, rec_number, field, diag_info)
    }
}

/// Outcome of one `get_diag_rec` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagReturn {
    /// A record was written (`SQL_SUCCESS` / `SQL_SUCCESS_WITH_INFO`).
    Record,
    /// `SQL_NO_DATA`: no record at this index.
    Exhausted,
    /// Any other code.
    Failed(SQLRETURN),
}

impl From<SQLRETURN> for DiagReturn {
    fn from(rc: SQLRETURN) -> Self {
        match rc {
            SQL_SUCCESS | SQL_SUCCESS_WITH_INFO => DiagReturn::Record,
            SQL_NO_DATA => DiagReturn::Exhausted,
            other => DiagReturn::Failed(other),
        }
    }
}

/// Outcome of one `get_diag_field` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLookup {
    Retrieved,
    Unavailable(SQLRETURN),
}

impl From<SQLRETURN> for FieldLookup {
    fn from(rc: SQLRETURN) -> Self {
        if sql_succeeded(rc) {
            FieldLookup::Retrieved
        } else {
            FieldLookup::Unavailable(rc)
        }
    }
}
