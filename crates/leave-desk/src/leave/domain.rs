use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::storage::StorageError;

/// Top-level key holding the employee mapping in the backing file.
pub const EMPLOYEES_KEY: &str = "Leaves_Data_Internal_Employees";
/// Top-level key holding the holiday list in the backing file.
pub const HOLIDAYS_KEY: &str = "holiday_calendar";

/// Balance and leave history for a single employee.
///
/// Fields the service does not understand are carried in `extra` so a
/// load/persist cycle never drops data written by other tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub balance: i64,
    pub history: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EmployeeRecord {
    pub fn new(balance: i64, history: &[&str]) -> Self {
        Self {
            balance,
            history: history.iter().map(|date| date.to_string()).collect(),
            extra: Map::new(),
        }
    }

    pub fn has_applied_for(&self, leave_date: &str) -> bool {
        self.history.iter().any(|date| date == leave_date)
    }
}

/// Everything persisted to the backing file; serialized as one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveData {
    #[serde(rename = "Leaves_Data_Internal_Employees")]
    pub employees: BTreeMap<String, EmployeeRecord>,
    pub holiday_calendar: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LeaveData {
    /// Dataset used whenever the backing file cannot be loaded.
    pub fn builtin() -> Self {
        let mut employees = BTreeMap::new();
        employees.insert(
            "Alice Johnson".to_string(),
            EmployeeRecord::new(10, &["2024-12-12", "2025-01-02"]),
        );
        employees.insert("Bob Smith".to_string(), EmployeeRecord::new(5, &[]));
        employees.insert(
            "Charlie Davis".to_string(),
            EmployeeRecord::new(8, &["2025-01-02"]),
        );

        let holiday_calendar = [
            "2025-01-01",
            "2025-01-20",
            "2025-02-17",
            "2025-05-26",
            "2025-07-04",
            "2025-09-01",
            "2025-11-27",
            "2025-11-28",
            "2025-12-25",
            "2025-12-31",
        ]
        .iter()
        .map(|date| date.to_string())
        .collect();

        Self {
            employees,
            holiday_calendar,
            extra: Map::new(),
        }
    }

    /// Parse the backing file contents, requiring both top-level keys.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        let value: Value = serde_json::from_str(raw).map_err(StorageError::Decode)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, StorageError> {
        let Some(object) = value.as_object() else {
            return Err(StorageError::NotAnObject);
        };
        for key in [EMPLOYEES_KEY, HOLIDAYS_KEY] {
            if !object.contains_key(key) {
                return Err(StorageError::MissingKey(key));
            }
        }
        serde_json::from_value(value).map_err(StorageError::Decode)
    }

    pub fn is_holiday(&self, leave_date: &str) -> bool {
        self.holiday_calendar.iter().any(|holiday| holiday == leave_date)
    }

    /// Employees whose stored balance is already below zero.
    pub fn negative_balances(&self) -> impl Iterator<Item = (&str, i64)> {
        self.employees
            .iter()
            .filter(|(_, record)| record.balance < 0)
            .map(|(name, record)| (name.as_str(), record.balance))
    }
}

/// Payload of a successful balance lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    pub employee_name: String,
    pub leave_balance: i64,
    pub leave_history: Vec<String>,
}

/// Payload of an approved and persisted leave application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApproval {
    pub message: String,
    pub updated_balance: i64,
    pub updated_history: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDirectory {
    pub employee_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    pub holidays: Vec<String>,
}
