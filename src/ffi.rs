use crate::driver::{DiagField, DiagSource};
use crate::handle::HandleType;
use crate::types::*;

#[cfg_attr(windows, link(name = "odbc32"))]
#[cfg_attr(not(windows), link(name = "odbc"))]
extern "system" {
    fn SQLGetDiagRec(
        handle_type: SQLSMALLINT,
        handle: SQLHANDLE,
        rec_number: SQLSMALLINT,
        sql_state: *mut SQLCHAR,
        native_error: *mut SQLINTEGER,
        message_text: *mut SQLCHAR,
        buffer_length: SQLSMALLINT,
        text_length: *mut SQLSMALLINT,
    ) -> SQLRETURN;

    fn SQLGetDiagField(
        handle_type: SQLSMALLINT,
        handle: SQLHANDLE,
        rec_number: SQLSMALLINT,
        diag_identifier: SQLSMALLINT,
        diag_info: SQLPOINTER,
        buffer_length: SQLSMALLINT,
        string_length: *mut SQLSMALLINT,
    ) -> SQLRETURN;
}

fn buffer_length(buf: &[u8]) -> SQLSMALLINT {
    std::cmp::min(buf.len(), SQLSMALLINT::MAX as usize) as SQLSMALLINT
}

/// Reads diagnostics from the system ODBC driver manager.
#[derive(Debug, Default, Clone, Copy)]
pub struct OdbcDriver;

impl DiagSource for OdbcDriver {
    fn get_diag_rec(
        &self,
        handle_type: HandleType,
        handle: SQLHANDLE,
        rec_number: SQLSMALLINT,
        sql_state: &mut [u8],
        native_error: &mut SQLINTEGER,
        message_text: &mut [u8],
    ) -> SQLRETURN {
        // The driver writes 5 chars + terminator unconditionally.
        if sql_state.len() < SQL_STATE_SIZE {
            return SQL_ERROR;
        }
        let mut text_length: SQLSMALLINT = 0;
        unsafe {
            SQLGetDiagRec(
                handle_type.as_raw(),
                handle,
                rec_number,
                sql_state.as_mut_ptr(),
                native_error,
                message_text.as_mut_ptr(),
                buffer_length(message_text),
                &mut text_length,
            )
        }
    }

    fn get_diag_field(
        &self,
        handle_type: HandleType,
        handle: SQLHANDLE,
        rec_number: SQLSMALLINT,
        field: DiagField,
        diag_info: &mut [u8],
    ) -> SQLRETURN {
        let mut string_length: SQLSMALLINT = 0;
        unsafe {
            SQLGetDiagField(
                handle_type.as_raw(),
                handle,
                rec_number,
                field.as_raw(),
                diag_info.as_mut_ptr() as SQLPOINTER,
                buffer_length(diag_info),
                &mut string_length,
            )
        }
    }
}
