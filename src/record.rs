use crate::buffer::BoundedBuf;
use crate::types::*;

fn state_array(bytes: &[u8]) -> [u8; SQL_STATE_SIZE] {
    let mut state = [0u8; SQL_STATE_SIZE];
    let copy_len = std::cmp::min(bytes.len(), SQL_SQLSTATE_SIZE);
    state[..copy_len].copy_from_slice(&bytes[..copy_len]);
    state
}

/// One diagnostic record as reported by the driver.
///
/// Holds its own copy of the driver's bytes; nothing in it changes after the
/// collector appends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    sql_state: [u8; SQL_STATE_SIZE],
    native_error: SQLINTEGER,
    message: Box<[u8]>,
}

impl DiagnosticRecord {
    pub fn new(sql_state: &str, native_error: SQLINTEGER, message: &str) -> Self {
        Self {
            sql_state: state_array(sql_state.as_bytes()),
            native_error,
            message: message.as_bytes().into(),
        }
    }

    pub(crate) fn from_buffers(
        sql_state: &BoundedBuf,
        native_error: SQLINTEGER,
        message: &BoundedBuf,
    ) -> Self {
        Self {
            sql_state: state_array(sql_state.as_bytes()),
            native_error,
            message: message.as_bytes().into(),
        }
    }

    /// SQLSTATE bytes without the terminator (at most 5).
    pub fn sql_state_bytes(&self) -> &[u8] {
        let len = self
            .sql_state
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(SQL_SQLSTATE_SIZE);
        &self.sql_state[..len]
    }

    pub fn sql_state(&self) -> String {
        String::from_utf8_lossy(self.sql_state_bytes()).into_owned()
    }

    pub fn native_error(&self) -> SQLINTEGER {
        self.native_error
    }

    pub fn message_bytes(&self) -> &[u8] {
        &self.message
    }

    pub fn message(&self) -> String {
        String::from_utf8_lossy(&self.message).into_owned()
    }
}
