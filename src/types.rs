#![allow(non_camel_case_types)]

use std::os::raw::c_void;

pub type SQLHANDLE = *mut c_void;
pub type SQLPOINTER = *mut c_void;
pub type SQLCHAR = u8;
pub type SQLSMALLINT = i16;
pub type SQLINTEGER = i32;
pub type SQLRETURN = SQLSMALLINT;

pub const SQL_NULL_HANDLE: SQLHANDLE = std::ptr::null_mut();

// Return codes
pub const SQL_SUCCESS: SQLRETURN = 0;
pub const SQL_SUCCESS_WITH_INFO: SQLRETURN = 1;
pub const SQL_STILL_EXECUTING: SQLRETURN = 2;
pub const SQL_NEED_DATA: SQLRETURN = 99;
pub const SQL_NO_DATA: SQLRETURN = 100;
pub const SQL_ERROR: SQLRETURN = -1;
pub const SQL_INVALID_HANDLE: SQLRETURN = -2;

// Handle types
pub const SQL_HANDLE_ENV: SQLSMALLINT = 1;
pub const SQL_HANDLE_DBC: SQLSMALLINT = 2;
pub const SQL_HANDLE_STMT: SQLSMALLINT = 3;
pub const SQL_HANDLE_DESC: SQLSMALLINT = 4;

// Diagnostic record fields (SQLGetDiagField)
pub const SQL_DIAG_CONNECTION_NAME: SQLSMALLINT = 10;
pub const SQL_DIAG_SERVER_NAME: SQLSMALLINT = 11;

// Sizes fixed by the ODBC headers
pub const SQL_SQLSTATE_SIZE: usize = 5;
pub const SQL_MAX_MESSAGE_LENGTH: usize = 512;

// Buffer capacities handed to the driver, terminator included
pub const SQL_STATE_SIZE: usize = SQL_SQLSTATE_SIZE + 1;
pub const SQL_MESSAGE_LENGTH: usize = SQL_MAX_MESSAGE_LENGTH + 1;
pub const SQL_NAME_LENGTH: usize = 128;

/// `SQL_SUCCEEDED` from sqltypes.h.
pub const fn sql_succeeded(rc: SQLRETURN) -> bool {
    rc == SQL_SUCCESS || rc == SQL_SUCCESS_WITH_INFO
}
