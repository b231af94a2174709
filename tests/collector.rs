//! Collection passes against the in-process driver.

use odbc_diag::memory::{DiagCall, MemoryDriver, NameField};
use odbc_diag::types::*;
use odbc_diag::*;
use rstest::{fixture, rstest};

#[fixture]
fn driver() -> MemoryDriver {
    MemoryDriver::new()
}

/// Statement handle carrying the two records of a truncating fetch that
/// then failed.
fn statement_with_two_records(driver: &MemoryDriver) -> SQLHANDLE {
    let h = driver.alloc(HandleType::Stmt);
    driver.post(h, "01004", 0, "String data, right truncated");
    driver.post(h, "HY000", -123, "General error");
    driver.set_connection_name(h, NameField::Value("PROD-DB-1".to_string()));
    driver.set_server_name(h, NameField::Value("db01.internal".to_string()));
    h
}

// ── Draining ────────────────────────────────────────────────────────

#[rstest]
fn drains_records_in_driver_order(driver: MemoryDriver) {
    let h = statement_with_two_records(&driver);
    let diag = StatementDiagnostics::new(driver.handle(h), &driver);

    assert_eq!(diag.count(), 2);
    assert_eq!(diag.sql_state(0), "01004");
    assert_eq!(diag.native_error(0), 0);
    assert_eq!(diag.message(0), "String data, right truncated");
    assert_eq!(diag.sql_state(1), "HY000");
    assert_eq!(diag.native_error(1), -123);
    assert_eq!(diag.message(1), "General error");
    assert_eq!(diag.connection_name(), "PROD-DB-1");
    assert_eq!(diag.server_name(), "db01.internal");
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(5)]
#[case(40)]
fn count_matches_posted_records(driver: MemoryDriver, #[case] k: usize) {
    let h = driver.alloc(HandleType::Dbc);
    for i in 0..k {
        driver.post(h, "01000", i as i32, &format!("warning {i}"));
    }
    let diag = ConnectionDiagnostics::new(driver.handle(h), &driver);

    assert_eq!(diag.count(), k);
    for (i, rec) in diag.iter().enumerate() {
        assert_eq!(rec.native_error(), i as i32);
        assert_eq!(rec.message(), format!("warning {i}"));
    }
}

#[rstest]
fn loop_stops_at_no_data(driver: MemoryDriver) {
    let h = statement_with_two_records(&driver);
    let _diag = StatementDiagnostics::new(driver.handle(h), &driver);

    let recs: Vec<_> = driver
        .calls(h)
        .into_iter()
        .filter(|c| matches!(c, DiagCall::Rec(_)))
        .collect();
    assert_eq!(recs, vec![DiagCall::Rec(1), DiagCall::Rec(2), DiagCall::Rec(3)]);
}

#[rstest]
fn driver_failure_ends_the_pass_without_error(driver: MemoryDriver) {
    let h = statement_with_two_records(&driver);
    driver.end_with(h, SQL_ERROR);
    let diag = StatementDiagnostics::new(driver.handle(h), &driver);

    assert_eq!(diag.count(), 2);
    assert_eq!(diag.sql_state(1), "HY000");
}

#[rstest]
fn wrong_handle_kind_yields_no_records(driver: MemoryDriver) {
    let h = statement_with_two_records(&driver);
    let diag = ConnectionDiagnostics::new(driver.handle(h), &driver);

    assert!(diag.is_empty());
    assert_eq!(diag.connection_name(), "");
}

#[rstest]
fn long_message_is_cut_to_declared_length(driver: MemoryDriver) {
    let h = driver.alloc(HandleType::Stmt);
    driver.post(h, "42S02", 208, "Invalid object name 'dbo.orders'.");
    let options = DiagOptions::with_max_message_length(7);
    let diag = StatementDiagnostics::with_options(driver.handle(h), &driver, options);

    assert_eq!(diag.message(0), "Invalid");
}

#[rstest]
fn default_message_capacity_keeps_512_bytes(driver: MemoryDriver) {
    let h = driver.alloc(HandleType::Stmt);
    let long = "x".repeat(600);
    driver.post(h, "HY000", 1, &long);
    let diag = StatementDiagnostics::new(driver.handle(h), &driver);

    assert_eq!(diag.message(0).len(), SQL_MAX_MESSAGE_LENGTH);
}

#[rstest]
fn overlong_sql_state_keeps_five_characters(driver: MemoryDriver) {
    let h = driver.alloc(HandleType::Desc);
    driver.post(h, "HY0001", 0, "odd driver");
    let diag = DescriptorDiagnostics::new(driver.handle(h), &driver);

    assert_eq!(diag.sql_state(0), "HY000");
}

// ── Null handle ─────────────────────────────────────────────────────

#[rstest]
fn null_handle_collects_nothing(driver: MemoryDriver) {
    let mut diag = EnvironmentDiagnostics::new(BorrowedHandle::null(), &driver);
    assert_eq!(diag.count(), 0);
    assert_eq!(diag.connection_name(), "");
    assert_eq!(diag.server_name(), "");

    diag.collect();
    assert_eq!(diag.count(), 0);
    assert_eq!(diag.connection_name(), "");
}

// ── Name fields ─────────────────────────────────────────────────────

#[rstest]
#[case::lookup_fails(NameField::Unavailable, "None")]
#[case::empty_value(NameField::Value(String::new()), "Not applicable")]
#[case::real_value(NameField::Value("PROD-DB-1".to_string()), "PROD-DB-1")]
fn connection_name_fallbacks(
    driver: MemoryDriver,
    #[case] field: NameField,
    #[case] expected: &str,
) {
    let h = driver.alloc(HandleType::Dbc);
    driver.post(h, "08S01", 10054, "Communication link failure");
    driver.set_connection_name(h, field);
    let diag = ConnectionDiagnostics::new(driver.handle(h), &driver);

    assert_eq!(diag.connection_name(), expected);
    assert_eq!(diag.count(), 1);
}

#[rstest]
fn environment_server_name_is_not_applicable(driver: MemoryDriver) {
    let h = driver.alloc(HandleType::Env);
    driver.post(h, "HY010", 0, "Function sequence error");
    driver.set_server_name(h, NameField::Value(String::new()));
    let diag = EnvironmentDiagnostics::new(driver.handle(h), &driver);

    assert_eq!(diag.connection_name(), NONE);
    assert_eq!(diag.server_name(), NOT_APPLICABLE);
}

#[rstest]
fn name_longer_than_buffer_is_truncated(driver: MemoryDriver) {
    let h = driver.alloc(HandleType::Dbc);
    driver.post(h, "01000", 0, "warning");
    driver.set_server_name(h, NameField::Value("s".repeat(300)));
    let diag = ConnectionDiagnostics::new(driver.handle(h), &driver);

    assert_eq!(diag.server_name().len(), SQL_NAME_LENGTH - 1);
}

#[rstest]
fn names_are_looked_up_for_the_first_record_only(driver: MemoryDriver) {
    let h = statement_with_two_records(&driver);
    let _diag = StatementDiagnostics::new(driver.handle(h), &driver);

    let fields: Vec<_> = driver
        .calls(h)
        .into_iter()
        .filter(|c| matches!(c, DiagCall::Field(..)))
        .collect();
    assert_eq!(
        fields,
        vec![
            DiagCall::Field(1, DiagField::ConnectionName),
            DiagCall::Field(1, DiagField::ServerName),
        ]
    );
}

#[rstest]
fn no_records_means_no_name_lookup(driver: MemoryDriver) {
    let h = driver.alloc(HandleType::Dbc);
    driver.set_connection_name(h, NameField::Value("PROD-DB-1".to_string()));
    let diag = ConnectionDiagnostics::new(driver.handle(h), &driver);

    assert_eq!(diag.count(), 0);
    assert_eq!(diag.connection_name(), "");
    assert_eq!(driver.calls(h), vec![DiagCall::Rec(1)]);
}

#[rstest]
fn failed_lookup_does_not_keep_previous_name(driver: MemoryDriver) {
    let h = driver.alloc(HandleType::Dbc);
    driver.post(h, "01000", 0, "warning");
    driver.set_connection_name(h, NameField::Value("PROD-DB-1".to_string()));
    let mut diag = ConnectionDiagnostics::new(driver.handle(h), &driver);
    assert_eq!(diag.connection_name(), "PROD-DB-1");

    driver.set_connection_name(h, NameField::Unavailable);
    diag.collect();
    assert_eq!(diag.connection_name(), "None");
}

// ── Re-collection and reset ─────────────────────────────────────────

#[rstest]
fn collecting_twice_is_idempotent(driver: MemoryDriver) {
    let h = statement_with_two_records(&driver);
    let mut diag = StatementDiagnostics::new(driver.handle(h), &driver);
    let first = diag.report();

    diag.collect();
    assert_eq!(diag.report(), first);
}

#[rstest]
fn collect_picks_up_new_records(driver: MemoryDriver) {
    let h = statement_with_two_records(&driver);
    let mut diag = StatementDiagnostics::new(driver.handle(h), &driver);

    driver.clear(h);
    driver.post(h, "40001", 1205, "Deadlock victim");
    diag.collect();

    assert_eq!(diag.count(), 1);
    assert_eq!(diag.sql_state(0), "40001");
    assert_eq!(diag.native_error(0), 1205);
}

#[rstest]
fn reset_keeps_names(driver: MemoryDriver) {
    let h = statement_with_two_records(&driver);
    let mut diag = StatementDiagnostics::new(driver.handle(h), &driver);

    diag.reset();
    assert_eq!(diag.count(), 0);
    assert!(diag.get(0).is_none());
    assert_eq!(diag.connection_name(), "PROD-DB-1");
    assert_eq!(diag.server_name(), "db01.internal");
}

#[rstest]
fn records_are_independent_copies(driver: MemoryDriver) {
    let h = statement_with_two_records(&driver);
    let mut diag = StatementDiagnostics::new(driver.handle(h), &driver);
    let state = diag.sql_state(0);
    let kept = diag.records().to_vec();

    driver.clear(h);
    diag.collect();
    assert_eq!(state, "01004");
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[1].message(), "General error");
}

#[rstest]
fn iterates_by_reference(driver: MemoryDriver) {
    let h = statement_with_two_records(&driver);
    let diag = StatementDiagnostics::new(driver.handle(h), &driver);

    let states: Vec<String> = (&diag).into_iter().map(|r| r.sql_state()).collect();
    assert_eq!(states, ["01004", "HY000"]);
    assert_eq!(diag.handle_type(), HandleType::Stmt);
}

// ── Contract violations ─────────────────────────────────────────────

#[rstest]
#[should_panic(expected = "out of range")]
fn sql_state_one_past_the_end_panics(driver: MemoryDriver) {
    let h = statement_with_two_records(&driver);
    let diag = StatementDiagnostics::new(driver.handle(h), &driver);
    let _ = diag.sql_state(diag.count());
}

#[rstest]
#[should_panic(expected = "out of range")]
fn message_on_empty_collector_panics(driver: MemoryDriver) {
    let diag = StatementDiagnostics::new(BorrowedHandle::null(), &driver);
    let _ = diag.message(0);
}

#[rstest]
#[should_panic(expected = "out of range")]
fn native_error_after_reset_panics(driver: MemoryDriver) {
    let h = statement_with_two_records(&driver);
    let mut diag = StatementDiagnostics::new(driver.handle(h), &driver);
    diag.reset();
    let _ = diag.native_error(0);
}
