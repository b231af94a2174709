use crate::types::*;
use std::fmt;
use std::marker::PhantomData;

/// Runtime discriminator for the four ODBC handle types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleType {
    Env,
    Dbc,
    Stmt,
    Desc,
}

impl HandleType {
    pub const fn as_raw(self) -> SQLSMALLINT {
        match self {
            HandleType::Env => SQL_HANDLE_ENV,
            HandleType::Dbc => SQL_HANDLE_DBC,
            HandleType::Stmt => SQL_HANDLE_STMT,
            HandleType::Desc => SQL_HANDLE_DESC,
        }
    }

    pub const fn from_raw(raw: SQLSMALLINT) -> Option<Self> {
        match raw {
            SQL_HANDLE_ENV => Some(HandleType::Env),
            SQL_HANDLE_DBC => Some(HandleType::Dbc),
            SQL_HANDLE_STMT => Some(HandleType::Stmt),
            SQL_HANDLE_DESC => Some(HandleType::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for HandleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HandleType::Env => "environment",
            HandleType::Dbc => "connection",
            HandleType::Stmt => "statement",
            HandleType::Desc => "descriptor",
        };
        f.write_str(name)
    }
}

/// Compile-time handle kind. Implemented by the four marker types below so a
/// collector for a statement handle cannot be fed a connection handle.
pub trait HandleKind {
    const TYPE: HandleType;
}

/// Environment handle (`SQLHENV`)
pub enum Environment {}

/// Connection handle (`SQLHDBC`)
pub enum Connection {}

/// Statement handle (`SQLHSTMT`)
pub enum Statement {}

/// Descriptor handle (`SQLHDESC`)
pub enum Descriptor {}

impl HandleKind for Environment {
    const TYPE: HandleType = HandleType::Env;
}

impl HandleKind for Connection {
    const TYPE: HandleType = HandleType::Dbc;
}

impl HandleKind for Statement {
    const TYPE: HandleType = HandleType::Stmt;
}

impl HandleKind for Descriptor {
    const TYPE: HandleType = HandleType::Desc;
}

/// A raw ODBC handle borrowed from its owner for `'h`.
///
/// Never allocates or frees the handle. The lifetime keeps anything built on
/// top of it (e.g. a collector) from outliving the owner's guarantee that the
/// handle stays allocated.
pub struct BorrowedHandle<'h, K: HandleKind> {
    raw: SQLHANDLE,
    _owner: PhantomData<&'h ()>,
    _kind: PhantomData<K>,
}

impl<'h, K: HandleKind> BorrowedHandle<'h, K> {
    /// The null-handle sentinel. Collecting against it yields no records.
    pub const fn null() -> Self {
        Self {
            raw: SQL_NULL_HANDLE,
            _owner: PhantomData,
            _kind: PhantomData,
        }
    }

    /// Wraps a raw handle.
    ///
    /// # Safety
    ///
    /// `raw` must be null or a handle of type `K::TYPE` that stays allocated
    /// for all of `'h`.
    pub unsafe fn from_raw(raw: SQLHANDLE) -> Self {
        Self {
            raw,
            _owner: PhantomData,
            _kind: PhantomData,
        }
    }

    pub fn as_raw(&self) -> SQLHANDLE {
        self.raw
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }

    pub fn handle_type(&self) -> HandleType {
        K::TYPE
    }
}

impl<K: HandleKind> Clone for BorrowedHandle<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: HandleKind> Copy for BorrowedHandle<'_, K> {}

impl<K: HandleKind> fmt::Debug for BorrowedHandle<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BorrowedHandle")
            .field("type", &K::TYPE)
            .field("raw", &self.raw)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_type_codes_round_trip_through_raw() {
        for ty in [HandleType::Env, HandleType::Dbc, HandleType::Stmt, HandleType::Desc] {
            assert_eq!(HandleType::from_raw(ty.as_raw()), Some(ty));
        }
        assert_eq!(HandleType::from_raw(0), None);
        assert_eq!(HandleType::from_raw(5), None);
    }

    #[test]
    fn null_handle_reports_its_kind() {
        let h = BorrowedHandle::<Statement>::null();
        assert!(h.is_null());
        assert_eq!(h.handle_type(), HandleType::Stmt);
        assert_eq!(h.handle_type().to_string(), "statement");
    }
}
