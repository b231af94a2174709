use crate::collector::DiagnosticsCollector;
use crate::driver::DiagSource;
use crate::handle::{BorrowedHandle, HandleKind, HandleType};
use crate::report::DiagnosticReport;
use crate::types::*;

/// Failure of a driver call, with whatever the driver said about it.
#[derive(Debug, thiserror::Error)]
pub enum OdbcError {
    /// The call failed; `report` holds the handle's diagnostics taken right
    /// after the failure.
    #[error("{kind} handle call returned {code}\n{report}")]
    Handle {
        kind: HandleType,
        code: SQLRETURN,
        report: DiagnosticReport,
    },

    /// `SQL_INVALID_HANDLE`: the handle cannot be asked for diagnostics.
    #[error("invalid {kind} handle")]
    InvalidHandle { kind: HandleType },
}

impl OdbcError {
    pub fn report(&self) -> Option<&DiagnosticReport> {
        match self {
            OdbcError::Handle { report, .. } => Some(report),
            OdbcError::InvalidHandle { .. } => None,
        }
    }
}

/// Passes `SQL_SUCCESS`, `SQL_SUCCESS_WITH_INFO` and `SQL_NO_DATA` through;
/// anything else becomes an [`OdbcError`] carrying the handle's diagnostics.
pub fn check_return<K: HandleKind, D: DiagSource>(
    rc: SQLRETURN,
    handle: BorrowedHandle<'_, K>,
    driver: D,
) -> Result<SQLRETURN, OdbcError> {
    match rc {
        SQL_SUCCESS | SQL_SUCCESS_WITH_INFO | SQL_NO_DATA => Ok(rc),
        SQL_INVALID_HANDLE => Err(OdbcError::InvalidHandle { kind: K::TYPE }),
        code => {
            let diagnostics = DiagnosticsCollector::new(handle, driver);
            Err(OdbcError::Handle {
                kind: K::TYPE,
                code,
                report: diagnostics.report(),
            })
        }
    }
}
