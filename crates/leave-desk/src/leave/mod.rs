//! Employee leave balances, holiday calendar, and the rule-checked leave
//! application pipeline backed by a single JSON file.

pub mod domain;
pub mod outcome;
pub mod router;
pub mod storage;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    EmployeeDirectory, EmployeeRecord, HolidayCalendar, LeaveApproval, LeaveBalance, LeaveData,
    EMPLOYEES_KEY, HOLIDAYS_KEY,
};
pub use outcome::{LeaveRejection, OperationResult};
pub use router::leave_router;
pub use storage::{JsonFileStorage, LeaveStorage, StorageError};
pub use store::LeaveStore;
