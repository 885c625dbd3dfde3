//! Named tool surface over the leave store.
//!
//! Callers address operations by their stable tool names and pass arguments as
//! a JSON object; results come back as the `success` envelope.

pub mod rpc;

use std::str::FromStr;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::leave::{LeaveStorage, LeaveStore, OperationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    CheckLeaveBalance,
    ApplyForLeave,
    GetAllEmployees,
    GetHolidayCalendar,
}

impl ToolName {
    pub const ALL: [Self; 4] = [
        Self::CheckLeaveBalance,
        Self::ApplyForLeave,
        Self::GetAllEmployees,
        Self::GetHolidayCalendar,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CheckLeaveBalance => "check_leave_balance",
            Self::ApplyForLeave => "apply_for_leave",
            Self::GetAllEmployees => "get_all_employees",
            Self::GetHolidayCalendar => "get_holiday_calendar",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::CheckLeaveBalance => "Check an employee's leave balance and history.",
            Self::ApplyForLeave => "Apply for a leave on a specific date.",
            Self::GetAllEmployees => "List all employees in the system.",
            Self::GetHolidayCalendar => "Retrieve the holiday calendar.",
        }
    }

    pub fn input_schema(self) -> Value {
        match self {
            Self::CheckLeaveBalance => json!({
                "type": "object",
                "properties": {
                    "employee_name": { "type": "string" }
                },
                "required": ["employee_name"]
            }),
            Self::ApplyForLeave => json!({
                "type": "object",
                "properties": {
                    "employee_name": { "type": "string" },
                    "leave_date": { "type": "string", "description": "YYYY-MM-DD" }
                },
                "required": ["employee_name", "leave_date"]
            }),
            Self::GetAllEmployees | Self::GetHolidayCalendar => json!({
                "type": "object",
                "properties": {}
            }),
        }
    }
}

impl FromStr for ToolName {
    type Err = GatewayError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == value)
            .ok_or_else(|| GatewayError::UnknownTool(value.to_string()))
    }
}

/// Entry returned by tool discovery.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

pub fn tool_catalog() -> Vec<ToolDescriptor> {
    ToolName::ALL
        .into_iter()
        .map(|tool| ToolDescriptor {
            name: tool.as_str(),
            description: tool.description(),
            input_schema: tool.input_schema(),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct EmployeeArguments {
    employee_name: String,
}

#[derive(Debug, Deserialize)]
struct LeaveApplicationArguments {
    employee_name: String,
    leave_date: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),
    #[error("invalid arguments for '{tool}': {source}")]
    InvalidArguments {
        tool: &'static str,
        source: serde_json::Error,
    },
    #[error("unable to encode tool result: {0}")]
    Encode(#[source] serde_json::Error),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::UnknownTool(_) => StatusCode::NOT_FOUND,
            GatewayError::InvalidArguments { .. } => StatusCode::BAD_REQUEST,
            GatewayError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn parse_arguments<T>(tool: ToolName, arguments: Value) -> Result<T, GatewayError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_value(arguments).map_err(|source| GatewayError::InvalidArguments {
        tool: tool.as_str(),
        source,
    })
}

fn encode<T: Serialize>(result: OperationResult<T>) -> Result<Value, GatewayError> {
    serde_json::to_value(result).map_err(GatewayError::Encode)
}

/// Dispatch a named tool call and return its result envelope.
pub fn call_tool<S>(
    store: &LeaveStore<S>,
    name: &str,
    arguments: Value,
) -> Result<Value, GatewayError>
where
    S: LeaveStorage + 'static,
{
    let tool: ToolName = name.parse()?;
    match tool {
        ToolName::CheckLeaveBalance => {
            let args: EmployeeArguments = parse_arguments(tool, arguments)?;
            encode(store.check_leave_balance(&args.employee_name).into())
        }
        ToolName::ApplyForLeave => {
            let args: LeaveApplicationArguments = parse_arguments(tool, arguments)?;
            encode(
                store
                    .apply_for_leave(&args.employee_name, &args.leave_date)
                    .into(),
            )
        }
        ToolName::GetAllEmployees => encode(OperationResult::Success(store.get_all_employees())),
        ToolName::GetHolidayCalendar => {
            encode(OperationResult::Success(store.get_holiday_calendar()))
        }
    }
}
