use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::outcome::{LeaveRejection, OperationResult};
use super::storage::LeaveStorage;
use super::store::LeaveStore;
use crate::error::AppError;
use crate::gateway::{call_tool, tool_catalog};

/// Body accepted by the leave application endpoint.
#[derive(Debug, Deserialize)]
pub struct LeaveApplicationRequest {
    pub leave_date: String,
}

/// Router builder exposing the leave operations over HTTP.
pub fn leave_router<S>(store: Arc<LeaveStore<S>>) -> Router
where
    S: LeaveStorage + 'static,
{
    Router::new()
        .route("/api/v1/employees", get(employees_handler::<S>))
        .route(
            "/api/v1/employees/:employee_name/balance",
            get(balance_handler::<S>),
        )
        .route(
            "/api/v1/employees/:employee_name/leave",
            post(apply_handler::<S>),
        )
        .route("/api/v1/holidays", get(holidays_handler::<S>))
        .route("/api/v1/tools", get(tools_handler))
        .route("/api/v1/tools/:tool_name", post(tool_call_handler::<S>))
        .with_state(store)
}

pub(crate) fn rejection_status(rejection: &LeaveRejection) -> StatusCode {
    match rejection {
        LeaveRejection::EmployeeNotFound { .. } => StatusCode::NOT_FOUND,
        LeaveRejection::InvalidFormat | LeaveRejection::InvalidDate => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LeaveRejection::Holiday { .. }
        | LeaveRejection::AlreadyApplied { .. }
        | LeaveRejection::InsufficientBalance { .. } => StatusCode::CONFLICT,
        LeaveRejection::PersistenceFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn envelope_response<T: Serialize>(result: OperationResult<T>) -> Response {
    let status = match &result {
        OperationResult::Success(_) => StatusCode::OK,
        OperationResult::Failure(rejection) => rejection_status(rejection),
    };
    (status, Json(result)).into_response()
}

pub(crate) async fn employees_handler<S>(State(store): State<Arc<LeaveStore<S>>>) -> Response
where
    S: LeaveStorage + 'static,
{
    envelope_response(OperationResult::Success(store.get_all_employees()))
}

pub(crate) async fn balance_handler<S>(
    State(store): State<Arc<LeaveStore<S>>>,
    Path(employee_name): Path<String>,
) -> Response
where
    S: LeaveStorage + 'static,
{
    envelope_response(store.check_leave_balance(&employee_name).into())
}

/// Applications write the data file, so they run on the blocking pool.
pub(crate) async fn apply_handler<S>(
    State(store): State<Arc<LeaveStore<S>>>,
    Path(employee_name): Path<String>,
    Json(request): Json<LeaveApplicationRequest>,
) -> Result<Response, AppError>
where
    S: LeaveStorage + 'static,
{
    let result = tokio::task::spawn_blocking(move || {
        store.apply_for_leave(&employee_name, &request.leave_date)
    })
    .await?;
    Ok(envelope_response(result.into()))
}

pub(crate) async fn holidays_handler<S>(State(store): State<Arc<LeaveStore<S>>>) -> Response
where
    S: LeaveStorage + 'static,
{
    envelope_response(OperationResult::Success(store.get_holiday_calendar()))
}

pub(crate) async fn tools_handler() -> Json<Value> {
    Json(json!({ "tools": tool_catalog() }))
}

pub(crate) async fn tool_call_handler<S>(
    State(store): State<Arc<LeaveStore<S>>>,
    Path(tool_name): Path<String>,
    arguments: Option<Json<Value>>,
) -> Result<Response, AppError>
where
    S: LeaveStorage + 'static,
{
    let arguments = arguments.map(|Json(value)| value).unwrap_or(Value::Null);
    let envelope =
        tokio::task::spawn_blocking(move || call_tool(&store, &tool_name, arguments)).await??;
    Ok((StatusCode::OK, Json(envelope)).into_response())
}
