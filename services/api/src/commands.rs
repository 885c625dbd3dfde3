use crate::infra::open_store;
use leave_desk::config::AppConfig;
use leave_desk::error::AppError;
use leave_desk::gateway::{call_tool, GatewayError, ToolName};
use serde_json::{json, Value};

/// One-shot operation requested from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Query {
    Balance {
        employee_name: String,
    },
    Apply {
        employee_name: String,
        leave_date: String,
    },
    Employees,
    Holidays,
}

impl Query {
    fn tool_call(self) -> (ToolName, Value) {
        match self {
            Query::Balance { employee_name } => (
                ToolName::CheckLeaveBalance,
                json!({ "employee_name": employee_name }),
            ),
            Query::Apply {
                employee_name,
                leave_date,
            } => (
                ToolName::ApplyForLeave,
                json!({ "employee_name": employee_name, "leave_date": leave_date }),
            ),
            Query::Employees => (ToolName::GetAllEmployees, Value::Null),
            Query::Holidays => (ToolName::GetHolidayCalendar, Value::Null),
        }
    }
}

pub(crate) fn run_query(config: &AppConfig, query: Query) -> Result<(), AppError> {
    let store = open_store(config);
    let (tool, arguments) = query.tool_call();
    let envelope = call_tool(&store, tool.as_str(), arguments)?;
    let rendered = serde_json::to_string_pretty(&envelope).map_err(GatewayError::Encode)?;
    println!("{rendered}");
    Ok(())
}
