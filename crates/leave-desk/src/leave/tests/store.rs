use std::sync::Arc;

use serde_json::json;

use super::common::{builtin_store, failing_store, MemoryStorage};
use crate::leave::{
    EmployeeRecord, LeaveData, LeaveRejection, LeaveStorage, LeaveStore, OperationResult,
};

fn record<S: LeaveStorage + 'static>(store: &LeaveStore<S>, name: &str) -> EmployeeRecord {
    store
        .snapshot()
        .employees
        .get(name)
        .cloned()
        .expect("employee present")
}

#[test]
fn open_falls_back_to_builtin_when_storage_is_empty() {
    let storage = Arc::new(MemoryStorage::default());
    let store = LeaveStore::open(storage);
    assert_eq!(store.snapshot(), LeaveData::builtin());
}

#[test]
fn check_leave_balance_returns_balance_and_history() {
    let (store, _) = builtin_store();
    let balance = store
        .check_leave_balance("Alice Johnson")
        .expect("alice exists");
    assert_eq!(balance.employee_name, "Alice Johnson");
    assert_eq!(balance.leave_balance, 10);
    assert_eq!(balance.leave_history, vec!["2024-12-12", "2025-01-02"]);
}

#[test]
fn unknown_employee_is_rejected_by_lookup_and_application() {
    let (store, storage) = builtin_store();
    for name in ["Dana Scully", "alice johnson", ""] {
        let expected = LeaveRejection::employee_not_found(name);
        assert_eq!(store.check_leave_balance(name), Err(expected.clone()));
        assert_eq!(store.apply_for_leave(name, "2025-03-10"), Err(expected));
    }
    assert_eq!(
        LeaveRejection::employee_not_found("Dana Scully").to_string(),
        "Employee 'Dana Scully' not found."
    );
    assert!(storage.persisted().is_empty());
}

#[test]
fn successful_application_decrements_balance_and_persists() {
    let (store, storage) = builtin_store();
    let approval = store
        .apply_for_leave("Bob Smith", "2025-03-10")
        .expect("leave approved");

    assert_eq!(approval.message, "Leave successfully applied for 2025-03-10.");
    assert_eq!(approval.updated_balance, 4);
    assert_eq!(approval.updated_history, vec!["2025-03-10"]);

    let persisted = storage.persisted();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0], store.snapshot());
}

#[test]
fn repeating_an_application_is_rejected_as_duplicate() {
    let (store, storage) = builtin_store();
    store
        .apply_for_leave("Bob Smith", "2025-03-10")
        .expect("first application approved");

    let err = store
        .apply_for_leave("Bob Smith", "2025-03-10")
        .expect_err("duplicate rejected");
    assert_eq!(err.to_string(), "Leave has already been applied for 2025-03-10.");
    assert_eq!(record(&store, "Bob Smith").balance, 4);
    assert_eq!(storage.persisted().len(), 1);
}

#[test]
fn holiday_application_is_rejected_without_mutation() {
    let (store, storage) = builtin_store();
    let before = store.snapshot();

    let err = store
        .apply_for_leave("Bob Smith", "2025-01-01")
        .expect_err("holiday rejected");
    assert_eq!(
        err.to_string(),
        "Cannot apply for leave on 2025-01-01 as it is a holiday."
    );
    assert_eq!(store.snapshot(), before);
    assert_eq!(record(&store, "Bob Smith").balance, 5);
    assert!(storage.persisted().is_empty());
}

#[test]
fn validation_failures_leave_state_untouched() {
    let (store, storage) = builtin_store();
    let before = store.snapshot();

    let cases = [
        ("Alice Johnson", "2025-1-2", LeaveRejection::InvalidFormat),
        ("Alice Johnson", "2025-02-30", LeaveRejection::InvalidDate),
        (
            "Alice Johnson",
            "2025-01-02",
            LeaveRejection::AlreadyApplied {
                leave_date: "2025-01-02".to_string(),
            },
        ),
        (
            "Charlie Davis",
            "2025-12-25",
            LeaveRejection::Holiday {
                leave_date: "2025-12-25".to_string(),
            },
        ),
    ];

    for (name, date, expected) in cases {
        assert_eq!(store.apply_for_leave(name, date), Err(expected));
        assert_eq!(store.snapshot(), before);
    }
    assert!(storage.persisted().is_empty());
}

#[test]
fn checks_short_circuit_in_declared_order() {
    let (store, _) = builtin_store();

    // format is checked before employee existence
    assert_eq!(
        store.apply_for_leave("Nobody", "2025/01/02"),
        Err(LeaveRejection::InvalidFormat)
    );
    // calendar validity before employee existence
    assert_eq!(
        store.apply_for_leave("Nobody", "2025-02-30"),
        Err(LeaveRejection::InvalidDate)
    );
    // employee existence before holiday
    assert_eq!(
        store.apply_for_leave("Nobody", "2025-01-01"),
        Err(LeaveRejection::employee_not_found("Nobody"))
    );
}

#[test]
fn holiday_wins_over_duplicate_and_balance_checks() {
    let mut data = LeaveData::builtin();
    data.employees.insert(
        "Erin Hale".to_string(),
        EmployeeRecord::new(0, &["2025-07-04"]),
    );
    let store = LeaveStore::with_data(Arc::new(MemoryStorage::default()), data);

    assert_eq!(
        store.apply_for_leave("Erin Hale", "2025-07-04"),
        Err(LeaveRejection::Holiday {
            leave_date: "2025-07-04".to_string()
        })
    );
    assert_eq!(
        store.apply_for_leave("Erin Hale", "2025-03-10"),
        Err(LeaveRejection::InsufficientBalance { balance: 0 })
    );
}

#[test]
fn exhausted_or_negative_balance_is_rejected() {
    let mut data = LeaveData::builtin();
    data.employees
        .insert("Erin Hale".to_string(), EmployeeRecord::new(0, &[]));
    data.employees
        .insert("Frank Moss".to_string(), EmployeeRecord::new(-3, &[]));
    let storage = Arc::new(MemoryStorage::default());
    let store = LeaveStore::with_data(storage.clone(), data);

    let err = store
        .apply_for_leave("Erin Hale", "2025-03-10")
        .expect_err("zero balance rejected");
    assert_eq!(err.to_string(), "Insufficient leave balance: 0 days.");

    assert_eq!(
        store.apply_for_leave("Frank Moss", "2025-03-10"),
        Err(LeaveRejection::InsufficientBalance { balance: -3 })
    );
    assert!(storage.persisted().is_empty());
}

#[test]
fn balance_can_be_spent_down_to_zero() {
    let (store, _) = builtin_store();
    let dates = [
        "2025-03-03",
        "2025-03-04",
        "2025-03-05",
        "2025-03-06",
        "2025-03-07",
    ];
    for date in dates {
        store
            .apply_for_leave("Bob Smith", date)
            .expect("leave approved");
    }

    assert_eq!(
        store.apply_for_leave("Bob Smith", "2025-03-10"),
        Err(LeaveRejection::InsufficientBalance { balance: 0 })
    );
    let bob = record(&store, "Bob Smith");
    assert_eq!(bob.balance, 0);
    assert_eq!(bob.history, dates.to_vec());
}

#[test]
fn history_keeps_insertion_order() {
    let (store, _) = builtin_store();
    store
        .apply_for_leave("Alice Johnson", "2025-06-02")
        .expect("approved");
    let approval = store
        .apply_for_leave("Alice Johnson", "2025-03-10")
        .expect("approved");

    assert_eq!(
        approval.updated_history,
        vec!["2024-12-12", "2025-01-02", "2025-06-02", "2025-03-10"]
    );
    assert_eq!(approval.updated_balance, 8);
}

#[test]
fn failed_persistence_rolls_back_in_memory_change() {
    let (store, storage) = failing_store();
    let before = store.snapshot();

    let err = store
        .apply_for_leave("Charlie Davis", "2025-03-10")
        .expect_err("write failure surfaces");
    assert_eq!(err, LeaveRejection::PersistenceFailed);
    assert_eq!(
        err.to_string(),
        "Failed to save leave application due to a system error."
    );
    assert_eq!(storage.attempts(), 1);
    assert_eq!(store.snapshot(), before);

    // the rolled back date is not treated as a duplicate afterwards
    let err = store
        .apply_for_leave("Charlie Davis", "2025-03-10")
        .expect_err("write failure surfaces again");
    assert_eq!(err, LeaveRejection::PersistenceFailed);
    assert_eq!(storage.attempts(), 2);
}

#[test]
fn listings_are_sorted() {
    let mut data = LeaveData::builtin();
    data.employees
        .insert("Aaron Baker".to_string(), EmployeeRecord::new(1, &[]));
    data.holiday_calendar = vec![
        "2025-12-25".to_string(),
        "2025-01-01".to_string(),
        "2025-07-04".to_string(),
    ];
    let store = LeaveStore::with_data(Arc::new(MemoryStorage::default()), data);

    assert_eq!(
        store.get_all_employees().employee_names,
        vec!["Aaron Baker", "Alice Johnson", "Bob Smith", "Charlie Davis"]
    );
    assert_eq!(
        store.get_holiday_calendar().holidays,
        vec!["2025-01-01", "2025-07-04", "2025-12-25"]
    );
}

#[test]
fn builtin_listings_contain_every_key_once() {
    let (store, _) = builtin_store();
    let names = store.get_all_employees().employee_names;
    assert_eq!(names, vec!["Alice Johnson", "Bob Smith", "Charlie Davis"]);

    let holidays = store.get_holiday_calendar().holidays;
    assert_eq!(holidays.len(), 10);
    assert!(holidays.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(holidays.first().map(String::as_str), Some("2025-01-01"));
    assert_eq!(holidays.last().map(String::as_str), Some("2025-12-31"));
}

#[test]
fn operation_results_serialize_as_success_envelopes() {
    let (store, _) = builtin_store();

    let balance: OperationResult<_> = store.check_leave_balance("Bob Smith").into();
    assert_eq!(
        serde_json::to_value(&balance).expect("serializes"),
        json!({
            "success": true,
            "employee_name": "Bob Smith",
            "leave_balance": 5,
            "leave_history": []
        })
    );

    let missing: OperationResult<_> = store.check_leave_balance("Nobody").into();
    assert!(!missing.is_success());
    assert_eq!(
        serde_json::to_value(&missing).expect("serializes"),
        json!({ "success": false, "message": "Employee 'Nobody' not found." })
    );

    let approval: OperationResult<_> = store.apply_for_leave("Bob Smith", "2025-03-10").into();
    assert_eq!(
        serde_json::to_value(&approval).expect("serializes"),
        json!({
            "success": true,
            "message": "Leave successfully applied for 2025-03-10.",
            "updated_balance": 4,
            "updated_history": ["2025-03-10"]
        })
    );
}
