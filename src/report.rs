use crate::handle::HandleType;
use crate::record::DiagnosticRecord;
use std::fmt;

/// Owned copy of one collection pass, detached from the handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticReport {
    handle_type: HandleType,
    connection_name: String,
    server_name: String,
    records: Vec<DiagnosticRecord>,
}

impl DiagnosticReport {
    pub fn new(
        handle_type: HandleType,
        connection_name: String,
        server_name: String,
        records: Vec<DiagnosticRecord>,
    ) -> Self {
        Self {
            handle_type,
            connection_name,
            server_name,
            records,
        }
    }

    pub fn handle_type(&self) -> HandleType {
        self.handle_type
    }

    pub fn connection_name(&self) -> &str {
        &self.connection_name
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    pub fn records(&self) -> &[DiagnosticRecord] {
        &self.records
    }

    /// SQLSTATE of the first record, if any.
    pub fn first_sql_state(&self) -> Option<String> {
        self.records.first().map(DiagnosticRecord::sql_state)
    }

    /// Renders record `index` alone. Empty for an index past the end.
    pub fn to_string_at(&self, index: usize) -> String {
        match self.records.get(index) {
            Some(rec) => render_record(index, rec),
            None => String::new(),
        }
    }
}

fn render_record(index: usize, rec: &DiagnosticRecord) -> String {
    format!(
        "===========================\n\
         ODBC Diagnostic record #{}:\n\
         ===========================\n\
         SQLSTATE = {}\n\
         Native Error Code = {}\n\
         {}\n\n",
        index + 1,
        rec.sql_state(),
        rec.native_error(),
        rec.message()
    )
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Connection:{}\nServer:{}\n",
            self.connection_name, self.server_name
        )?;
        for (i, rec) in self.records.iter().enumerate() {
            f.write_str(&render_record(i, rec))?;
        }
        Ok(())
    }
}
