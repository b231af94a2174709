//! In-process driver for exercising collectors without a driver manager.
//!
//! Handles allocated here are opaque ids, never dereferenced. Each one owns a
//! diagnostics area that tests fill with records and name fields; lookups
//! are answered with the truncation rules a real driver applies.

use crate::driver::{DiagField, DiagSource};
use crate::handle::{BorrowedHandle, HandleKind, HandleType};
use crate::types::*;
use parking_lot::Mutex;

/// Diagnostic record as posted on a handle.
#[derive(Debug, Clone)]
pub struct DiagRecord {
    pub state: String, // 5-char SQLSTATE e.g. "HY000"
    pub native_error: i32,
    pub message: String,
}

/// How a handle answers a name-field lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameField {
    /// The lookup itself fails with `SQL_ERROR`.
    Unavailable,
    /// The lookup succeeds with this string, which may be empty.
    Value(String),
}

/// One call the driver received, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagCall {
    Rec(SQLSMALLINT),
    Field(SQLSMALLINT, DiagField),
}

struct DiagArea {
    handle_type: HandleType,
    records: Vec<DiagRecord>,
    connection_name: NameField,
    server_name: NameField,
    // Returned once the records are used up.
    terminator: SQLRETURN,
    calls: Vec<DiagCall>,
}

#[derive(Default)]
pub struct MemoryDriver {
    areas: Mutex<Vec<DiagArea>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a handle with an empty diagnostics area. Both name fields
    /// start out [`NameField::Unavailable`].
    pub fn alloc(&self, handle_type: HandleType) -> SQLHANDLE {
        let mut areas = self.areas.lock();
        areas.push(DiagArea {
            handle_type,
            records: Vec::new(),
            connection_name: NameField::Unavailable,
            server_name: NameField::Unavailable,
            terminator: SQL_NO_DATA,
            calls: Vec::new(),
        });
        areas.len() as SQLHANDLE
    }

    /// Borrows a handle of this driver. A kind that doesn't match the
    /// allocation is answered with `SQL_INVALID_HANDLE`.
    pub fn handle<K: HandleKind>(&self, raw: SQLHANDLE) -> BorrowedHandle<'_, K> {
        // SAFETY: handles of this driver are ids into `areas`, which lives as
        // long as the borrow of `self`; they are never dereferenced.
        unsafe { BorrowedHandle::from_raw(raw) }
    }

    pub fn post(&self, raw: SQLHANDLE, state: &str, native_error: i32, message: &str) {
        self.with_area(raw, |area| {
            area.records.push(DiagRecord {
                state: state.to_string(),
                native_error,
                message: message.to_string(),
            })
        });
    }

    pub fn clear(&self, raw: SQLHANDLE) {
        self.with_area(raw, |area| area.records.clear());
    }

    pub fn set_connection_name(&self, raw: SQLHANDLE, value: NameField) {
        self.with_area(raw, |area| area.connection_name = value);
    }

    pub fn set_server_name(&self, raw: SQLHANDLE, value: NameField) {
        self.with_area(raw, |area| area.server_name = value);
    }

    /// Code returned for the first record number past the posted records.
    pub fn end_with(&self, raw: SQLHANDLE, rc: SQLRETURN) {
        self.with_area(raw, |area| area.terminator = rc);
    }

    pub fn calls(&self, raw: SQLHANDLE) -> Vec<DiagCall> {
        self.with_area(raw, |area| area.calls.clone())
    }

    fn with_area<R>(&self, raw: SQLHANDLE, f: impl FnOnce(&mut DiagArea) -> R) -> R {
        let mut areas = self.areas.lock();
        let idx = (raw as usize).wrapping_sub(1);
        match areas.get_mut(idx) {
            Some(area) => f(area),
            None => panic!("handle {:?} was not allocated by this driver", raw),
        }
    }

    fn lookup<R>(
        &self,
        handle_type: HandleType,
        raw: SQLHANDLE,
        f: impl FnOnce(&mut DiagArea) -> R,
    ) -> Option<R> {
        let mut areas = self.areas.lock();
        let idx = (raw as usize).wrapping_sub(1);
        match areas.get_mut(idx) {
            Some(area) if area.handle_type == handle_type => Some(f(area)),
            _ => None,
        }
    }
}

/// Copies `src` into a C string buffer, cut to `buf.len() - 1` bytes.
/// Returns `SQL_SUCCESS_WITH_INFO` when it had to cut.
fn copy_c_str(src: &[u8], buf: &mut [u8]) -> SQLRETURN {
    if buf.is_empty() {
        return if src.is_empty() {
            SQL_SUCCESS
        } else {
            SQL_SUCCESS_WITH_INFO
        };
    }
    let copy_len = std::cmp::min(src.len(), buf.len() - 1);
    buf[..copy_len].copy_from_slice(&src[..copy_len]);
    buf[copy_len] = 0;
    if copy_len < src.len() {
        SQL_SUCCESS_WITH_INFO
    } else {
        SQL_SUCCESS
    }
}

impl DiagSource for MemoryDriver {
    fn get_diag_rec(
        &self,
        handle_type: HandleType,
        handle: SQLHANDLE,
        rec_number: SQLSMALLINT,
        sql_state: &mut [u8],
        native_error: &mut SQLINTEGER,
        message_text: &mut [u8],
    ) -> SQLRETURN {
        if handle.is_null() {
            return SQL_INVALID_HANDLE;
        }
        self.lookup(handle_type, handle, |area| {
            area.calls.push(DiagCall::Rec(rec_number));
            if rec_number < 1 {
                return SQL_ERROR;
            }
            let idx = rec_number as usize - 1;
            let rec = match area.records.get(idx) {
                Some(rec) => rec,
                None => return area.terminator,
            };

            // SQLSTATE: 5 chars, zero padded through the terminator
            let state_bytes = rec.state.as_bytes();
            let state_end = std::cmp::min(sql_state.len(), SQL_STATE_SIZE);
            let copy_len = std::cmp::min(state_bytes.len(), SQL_SQLSTATE_SIZE).min(state_end);
            sql_state[..copy_len].copy_from_slice(&state_bytes[..copy_len]);
            sql_state[copy_len..state_end].fill(0);

            *native_error = rec.native_error;

            copy_c_str(rec.message.as_bytes(), message_text)
        })
        .unwrap_or(SQL_INVALID_HANDLE)
    }

    fn get_diag_field(
        &self,
        handle_type: HandleType,
        handle: SQLHANDLE,
        rec_number: SQLSMALLINT,
        field: DiagField,
        diag_info: &mut [u8],
    ) -> SQLRETURN {
        if handle.is_null() {
            return SQL_INVALID_HANDLE;
        }
        self.lookup(handle_type, handle, |area| {
            area.calls.push(DiagCall::Field(rec_number, field));
            if rec_number < 1 || rec_number as usize > area.records.len() {
                return SQL_NO_DATA;
            }
            let value = match field {
                DiagField::ConnectionName => &area.connection_name,
                DiagField::ServerName => &area.server_name,
            };
            match value {
                NameField::Unavailable => SQL_ERROR,
                NameField::Value(s) => copy_c_str(s.as_bytes(), diag_info),
            }
        })
        .unwrap_or(SQL_INVALID_HANDLE)
    }
}
