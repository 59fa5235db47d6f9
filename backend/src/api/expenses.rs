//! Expense API handlers
//!
//! Contains HTTP request handlers for expense CRUD operations and summaries.
//! Structural checks happen here; business rules are left to
//! [`ExpenseService`].

use super::utils::{decode_body, parse_path_id, require_json_content_type};
use crate::error::AppError;
use crate::expenses::{Cents, Expense, ExpenseId, ExpenseService, NewExpense, TimeRangeKind};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Expense response type
///
/// The occurrence time is sent as `occurred_at`. Requests also accept the
/// older `occured_at` spelling, but responses only use the corrected one.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpenseResponse {
    /// Unique identifier
    pub id: ExpenseId,
    /// When the record was stored, RFC 3339
    pub created_at: String,
    /// When the expense happened, RFC 3339
    pub occurred_at: String,
    /// What the transaction was
    pub description: String,
    /// Amount in cents
    pub amount: Cents,
}

impl From<&Expense> for ExpenseResponse {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            created_at: expense.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            occurred_at: expense.occurred_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            description: expense.description.clone(),
            amount: expense.amount,
        }
    }
}

/// Message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message
    pub message: String,
    /// Status indicator
    pub status: String,
}

/// Summary response
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// Label of the summarized window
    pub range: String,
    /// Sum of matching amounts in cents
    pub total: Cents,
}

/// Create/update expense request
///
/// Every field is optional at the decoding stage so that all missing fields
/// can be reported together.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseRequest {
    /// Amount in cents
    pub amount: Option<Cents>,
    /// When the expense happened
    #[serde(alias = "occured_at")]
    pub occurred_at: Option<DateTime<Utc>>,
    /// What the transaction was
    pub description: Option<String>,
}

impl ExpenseRequest {
    /// Structural validation, collecting every issue
    pub fn validate(self) -> Result<NewExpense, AppError> {
        let mut issues = Vec::new();

        let amount = self.amount.filter(|amount| *amount > 0);
        if amount.is_none() {
            issues.push("field 'amount' is negative, missing, or zero".to_string());
        }
        if self.occurred_at.is_none() {
            issues.push("field 'occurred_at' is missing or empty".to_string());
        }
        let description = self.description.filter(|d| !d.is_empty());
        if description.is_none() {
            issues.push("field 'description' is missing or empty".to_string());
        }

        match (amount, self.occurred_at, description) {
            (Some(amount), Some(occurred_at), Some(description)) => {
                Ok(NewExpense::new(occurred_at, description, amount))
            }
            _ => Err(AppError::Validation(issues)),
        }
    }
}

/// Summary query parameters
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// Wire name of the time range kind, `all-time` when absent
    pub range: Option<String>,
    /// Kind-specific modifier
    #[serde(default)]
    pub modifier: String,
}

/// GET /api/expenses - List all expenses
pub async fn list_expenses(
    State(service): State<ExpenseService>,
) -> Result<Json<Vec<ExpenseResponse>>, AppError> {
    let expenses = service.get_all_expenses().await?;
    debug!("Listing {} expenses", expenses.len());

    Ok(Json(expenses.iter().map(ExpenseResponse::from).collect()))
}

/// POST /api/expenses - Record a new expense
pub async fn create_expense(
    State(service): State<ExpenseService>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<ExpenseResponse>), AppError> {
    require_json_content_type(&headers)?;
    let request: ExpenseRequest = decode_body(&body)?;
    let new = request.validate()?;

    let expense = service
        .create_expense(new.occurred_at, &new.description, new.amount)
        .await?;
    info!(expense_id = expense.id, "Created expense");

    Ok((StatusCode::CREATED, Json(ExpenseResponse::from(&expense))))
}

/// GET /api/expenses/:id - Get a specific expense
pub async fn get_expense(
    State(service): State<ExpenseService>,
    Path(raw_id): Path<String>,
) -> Result<Json<ExpenseResponse>, AppError> {
    let id = parse_path_id(&raw_id)?;
    let expense = service.get_expense_by_id(id).await?;
    debug!(expense_id = id, "Fetched expense");

    Ok(Json(ExpenseResponse::from(&expense)))
}

/// PUT /api/expenses/:id - Replace an expense's mutable fields
pub async fn update_expense(
    State(service): State<ExpenseService>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    require_json_content_type(&headers)?;
    let id = parse_path_id(&raw_id)?;
    let request: ExpenseRequest = decode_body(&body)?;
    let new = request.validate()?;

    service
        .update_expense(id, new.occurred_at, &new.description, new.amount)
        .await?;
    info!(expense_id = id, "Updated expense");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/expenses/:id - Delete an expense
pub async fn delete_expense(
    State(service): State<ExpenseService>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_path_id(&raw_id)?;
    service.delete_expense(id).await?;
    info!(expense_id = id, "Deleted expense");

    Ok(Json(MessageResponse {
        message: format!("Expense {} deleted successfully", id),
        status: "ok".to_string(),
    }))
}

/// GET /api/expenses/summary - Total the expenses in a time range
pub async fn summarize_expenses(
    State(service): State<ExpenseService>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, AppError> {
    let kind = match query.range.as_deref() {
        None | Some("") => TimeRangeKind::default(),
        Some(name) => TimeRangeKind::from_wire(name)
            .ok_or_else(|| AppError::BadRequest(format!("unknown summary range '{}'", name)))?,
    };

    let summary = service.summarize_expenses(kind, &query.modifier).await?;
    debug!(range = kind.as_str(), total = summary.total, "Summarized expenses");

    Ok(Json(SummaryResponse {
        range: summary.range_label,
        total: summary.total,
    }))
}
