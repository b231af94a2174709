use crate::types::*;

/// Largest message length that still fits a `SQLSMALLINT` buffer length once
/// the terminator is added.
const MAX_DECLARED_MESSAGE_LENGTH: usize = SQLSMALLINT::MAX as usize - 1;

/// Tunables for a collection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagOptions {
    /// Driver-declared maximum message length, terminator excluded.
    pub max_message_length: usize,
}

impl Default for DiagOptions {
    fn default() -> Self {
        Self {
            max_message_length: SQL_MAX_MESSAGE_LENGTH,
        }
    }
}

impl DiagOptions {
    pub fn with_max_message_length(max_message_length: usize) -> Self {
        Self {
            max_message_length: max_message_length.clamp(1, MAX_DECLARED_MESSAGE_LENGTH),
        }
    }

    /// Picks `DiagMessageLength=<n>` out of a `key=value;` connection string.
    /// Everything else, and values that don't parse, are ignored.
    pub fn from_connection_string(conn_str: &str) -> Self {
        let mut options = Self::default();
        for part in conn_str.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some(idx) = part.find('=') {
                let key = part[..idx].trim().to_lowercase();
                let val = part[idx + 1..].trim();
                if key == "diagmessagelength" {
                    if let Ok(n) = val.parse::<usize>() {
                        options = Self::with_max_message_length(n);
                    }
                }
            }
        }
        options
    }

    /// Capacity of the message buffer handed to the driver.
    pub fn message_capacity(&self) -> usize {
        self.max_message_length.clamp(1, MAX_DECLARED_MESSAGE_LENGTH) + 1
    }
}
