use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{error, info, warn};

use super::domain::{
    EmployeeDirectory, HolidayCalendar, LeaveApproval, LeaveBalance, LeaveData,
};
use super::outcome::LeaveRejection;
use super::storage::LeaveStorage;
use super::validation::parse_leave_date;

/// In-memory leave data plus the storage it is persisted to.
///
/// Every operation holds the data lock for its whole duration, so an
/// application's check, mutation and write happen as one step.
pub struct LeaveStore<S> {
    storage: Arc<S>,
    data: Mutex<LeaveData>,
}

impl<S> LeaveStore<S>
where
    S: LeaveStorage + 'static,
{
    /// Load from storage, substituting the built-in dataset on any failure.
    pub fn open(storage: Arc<S>) -> Self {
        let data = match storage.load() {
            Ok(data) => {
                info!(
                    employees = data.employees.len(),
                    holidays = data.holiday_calendar.len(),
                    "leave data loaded"
                );
                data
            }
            Err(err) => {
                warn!(error = %err, "unable to load leave data, using built-in dataset");
                LeaveData::builtin()
            }
        };

        for (employee_name, balance) in data.negative_balances() {
            warn!(employee = employee_name, balance, "stored leave balance is negative");
        }

        Self::with_data(storage, data)
    }

    pub fn with_data(storage: Arc<S>, data: LeaveData) -> Self {
        Self {
            storage,
            data: Mutex::new(data),
        }
    }

    /// Copy of the current in-memory dataset.
    pub fn snapshot(&self) -> LeaveData {
        self.lock().clone()
    }

    pub fn check_leave_balance(&self, employee_name: &str) -> Result<LeaveBalance, LeaveRejection> {
        let data = self.lock();
        let record = data
            .employees
            .get(employee_name)
            .ok_or_else(|| LeaveRejection::employee_not_found(employee_name))?;

        Ok(LeaveBalance {
            employee_name: employee_name.to_string(),
            leave_balance: record.balance,
            leave_history: record.history.clone(),
        })
    }

    /// Validate, record and persist a single day of leave.
    ///
    /// Checks run in a fixed order and stop at the first failure. When the
    /// write fails the in-memory change is reverted before returning.
    pub fn apply_for_leave(
        &self,
        employee_name: &str,
        leave_date: &str,
    ) -> Result<LeaveApproval, LeaveRejection> {
        let result = self.try_apply(employee_name, leave_date);
        match &result {
            Ok(approval) => info!(
                employee = employee_name,
                leave_date,
                balance = approval.updated_balance,
                "leave applied"
            ),
            Err(rejection) => info!(
                employee = employee_name,
                leave_date,
                reason = rejection.kind(),
                "leave application rejected"
            ),
        }
        result
    }

    fn try_apply(
        &self,
        employee_name: &str,
        leave_date: &str,
    ) -> Result<LeaveApproval, LeaveRejection> {
        parse_leave_date(leave_date)?;

        let mut data = self.lock();
        let is_holiday = data.is_holiday(leave_date);
        let record = data
            .employees
            .get_mut(employee_name)
            .ok_or_else(|| LeaveRejection::employee_not_found(employee_name))?;

        if is_holiday {
            return Err(LeaveRejection::Holiday {
                leave_date: leave_date.to_string(),
            });
        }
        if record.has_applied_for(leave_date) {
            return Err(LeaveRejection::AlreadyApplied {
                leave_date: leave_date.to_string(),
            });
        }
        if record.balance <= 0 {
            return Err(LeaveRejection::InsufficientBalance {
                balance: record.balance,
            });
        }

        record.history.push(leave_date.to_string());
        record.balance -= 1;

        if let Err(err) = self.storage.persist(&data) {
            error!(error = %err, employee = employee_name, "failed to persist leave application");
            if let Some(record) = data.employees.get_mut(employee_name) {
                if let Some(position) = record.history.iter().rposition(|date| date == leave_date) {
                    record.history.remove(position);
                }
                record.balance += 1;
            }
            return Err(LeaveRejection::PersistenceFailed);
        }

        let record = data
            .employees
            .get(employee_name)
            .ok_or_else(|| LeaveRejection::employee_not_found(employee_name))?;
        Ok(LeaveApproval {
            message: format!("Leave successfully applied for {leave_date}."),
            updated_balance: record.balance,
            updated_history: record.history.clone(),
        })
    }

    pub fn get_all_employees(&self) -> EmployeeDirectory {
        let data = self.lock();
        let mut employee_names: Vec<String> = data.employees.keys().cloned().collect();
        employee_names.sort();
        EmployeeDirectory { employee_names }
    }

    pub fn get_holiday_calendar(&self) -> HolidayCalendar {
        let data = self.lock();
        let mut holidays = data.holiday_calendar.clone();
        holidays.sort();
        HolidayCalendar { holidays }
    }

    fn lock(&self) -> MutexGuard<'_, LeaveData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
