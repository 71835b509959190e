//! Field validation for request bodies and query strings.
//!
//! # Design
//! Both entry points run the same four checks in a fixed order: priority,
//! status, category, date. The first failing check is returned and the rest
//! are skipped. They differ only in where the date comes from: `dueDate` in a
//! body, `date` in a query string.
//!
//! On success the present fields come back already parsed, so handlers never
//! re-parse strings.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::types::{
    Category, DueDate, Priority, Status, Todo, TodoPatch, TodoPayload, TodoQuery, UpdatedField,
};

/// A rejected request. `Display` is the exact text returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid Todo Priority")]
    Priority,
    #[error("Invalid Todo Status")]
    Status,
    #[error("Invalid Todo Category")]
    Category,
    #[error("Invalid Due Date")]
    DueDate,
    #[error("Missing {0}")]
    MissingField(Field),
    #[error("No Todo Fields To Update")]
    EmptyUpdate,
}

/// Body fields a create request must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Todo,
    Priority,
    Status,
    Category,
    DueDate,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Id => "Todo Id",
            Field::Todo => "Todo Text",
            Field::Priority => "Todo Priority",
            Field::Status => "Todo Status",
            Field::Category => "Todo Category",
            Field::DueDate => "Due Date",
        };
        f.write_str(label)
    }
}

/// Present fields after validation, in typed form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatedFields {
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub due_date: Option<DueDate>,
}

fn check<T: FromStr>(value: Option<&str>, err: ValidationError) -> Result<Option<T>, ValidationError> {
    value.map(|raw| raw.parse::<T>().map_err(|_| err)).transpose()
}

/// Body variant of `check`: a present value must be a JSON string.
fn check_json<T: FromStr>(
    value: Option<&Value>,
    err: ValidationError,
) -> Result<Option<T>, ValidationError> {
    match value {
        None => Ok(None),
        Some(Value::String(raw)) => check(Some(raw), err),
        Some(_) => Err(err),
    }
}

/// Validate a create/update body. The date field is `dueDate`.
pub fn validate_body(payload: &TodoPayload) -> Result<ValidatedFields, ValidationError> {
    Ok(ValidatedFields {
        priority: check_json(payload.priority.as_ref(), ValidationError::Priority)?,
        status: check_json(payload.status.as_ref(), ValidationError::Status)?,
        category: check_json(payload.category.as_ref(), ValidationError::Category)?,
        due_date: check_json(payload.due_date.as_ref(), ValidationError::DueDate)?,
    })
}

/// Validate a list/agenda query string. The date field is `date`.
pub fn validate_query(query: &TodoQuery) -> Result<ValidatedFields, ValidationError> {
    Ok(ValidatedFields {
        priority: check(query.priority.as_deref(), ValidationError::Priority)?,
        status: check(query.status.as_deref(), ValidationError::Status)?,
        category: check(query.category.as_deref(), ValidationError::Category)?,
        due_date: check(query.date.as_deref(), ValidationError::DueDate)?,
    })
}

/// Validate a create body and require every field.
///
/// Value checks run first, so a body that is both incomplete and carries a
/// bad priority reports the priority.
pub fn new_todo(payload: TodoPayload) -> Result<Todo, ValidationError> {
    let fields = validate_body(&payload)?;
    let missing = ValidationError::MissingField;
    Ok(Todo {
        id: payload.id.ok_or(missing(Field::Id))?,
        todo: payload.todo.ok_or(missing(Field::Todo))?,
        priority: fields.priority.ok_or(missing(Field::Priority))?,
        status: fields.status.ok_or(missing(Field::Status))?,
        category: fields.category.ok_or(missing(Field::Category))?,
        due_date: fields.due_date.ok_or(missing(Field::DueDate))?,
    })
}

/// Validate an update body into a patch plus the field to report.
///
/// An `id` in the body is ignored; the path decides which row changes.
pub fn todo_patch(payload: TodoPayload) -> Result<(TodoPatch, UpdatedField), ValidationError> {
    let fields = validate_body(&payload)?;
    let patch = TodoPatch {
        todo: payload.todo,
        priority: fields.priority,
        status: fields.status,
        category: fields.category,
        due_date: fields.due_date,
    };
    let updated = patch.updated_field().ok_or(ValidationError::EmptyUpdate)?;
    Ok((patch, updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> TodoPayload {
        TodoPayload {
            id: Some(1),
            todo: Some("Buy milk".to_string()),
            priority: Some("HIGH".into()),
            status: Some("TO DO".into()),
            category: Some("HOME".into()),
            due_date: Some("2024-05-01".into()),
        }
    }

    #[test]
    fn empty_body_passes() {
        let fields = validate_body(&TodoPayload::default()).unwrap();
        assert_eq!(fields, ValidatedFields::default());
    }

    #[test]
    fn each_bad_field_has_its_own_message() {
        let cases = [
            (
                TodoPayload { priority: Some("URGENT".into()), ..Default::default() },
                "Invalid Todo Priority",
            ),
            (
                TodoPayload { status: Some("STARTED".into()), ..Default::default() },
                "Invalid Todo Status",
            ),
            (
                TodoPayload { category: Some("GARDEN".into()), ..Default::default() },
                "Invalid Todo Category",
            ),
            (
                TodoPayload { due_date: Some("2024-02-30".into()), ..Default::default() },
                "Invalid Due Date",
            ),
        ];
        for (payload, message) in cases {
            let err = validate_body(&payload).unwrap_err();
            assert_eq!(err.to_string(), message);
        }
    }

    #[test]
    fn first_failure_wins_in_fixed_order() {
        let payload = TodoPayload {
            priority: Some("x".into()),
            status: Some("x".into()),
            category: Some("x".into()),
            due_date: Some("x".into()),
            ..Default::default()
        };
        assert_eq!(validate_body(&payload), Err(ValidationError::Priority));

        let payload = TodoPayload {
            status: Some("x".into()),
            category: Some("x".into()),
            due_date: Some("x".into()),
            ..Default::default()
        };
        assert_eq!(validate_body(&payload), Err(ValidationError::Status));

        let payload = TodoPayload {
            category: Some("x".into()),
            due_date: Some("x".into()),
            ..Default::default()
        };
        assert_eq!(validate_body(&payload), Err(ValidationError::Category));
    }

    #[test]
    fn null_or_non_string_body_values_are_invalid() {
        let cases = [
            (TodoPayload { priority: Some(Value::from(5)), ..Default::default() }, ValidationError::Priority),
            (TodoPayload { status: Some(Value::Null), ..Default::default() }, ValidationError::Status),
            (TodoPayload { status: Some(Value::Bool(true)), ..Default::default() }, ValidationError::Status),
            (
                TodoPayload { category: Some(serde_json::json!(["HOME"])), ..Default::default() },
                ValidationError::Category,
            ),
            (TodoPayload { due_date: Some(Value::from(20240501)), ..Default::default() }, ValidationError::DueDate),
        ];
        for (payload, expected) in cases {
            assert_eq!(validate_body(&payload), Err(expected), "{payload:?}");
        }
    }

    #[test]
    fn null_status_blocks_update() {
        let payload: TodoPayload =
            serde_json::from_str(r#"{"status":null,"todo":"changed"}"#).unwrap();
        assert_eq!(todo_patch(payload), Err(ValidationError::Status));
    }

    #[test]
    fn query_checks_category_membership() {
        let query = TodoQuery {
            category: Some("GARDEN".into()),
            ..Default::default()
        };
        assert_eq!(validate_query(&query), Err(ValidationError::Category));

        let query = TodoQuery {
            category: Some("LEARNING".into()),
            ..Default::default()
        };
        assert_eq!(validate_query(&query).unwrap().category, Some(Category::Learning));
    }

    #[test]
    fn query_reads_date_not_due_date() {
        let query = TodoQuery {
            date: Some("2024/05/01".into()),
            ..Default::default()
        };
        let fields = validate_query(&query).unwrap();
        assert_eq!(fields.due_date.unwrap().to_string(), "2024-05-01");

        let query = TodoQuery {
            date: Some("someday".into()),
            ..Default::default()
        };
        assert_eq!(validate_query(&query), Err(ValidationError::DueDate));
    }

    #[test]
    fn new_todo_normalizes_date() {
        let mut payload = full_payload();
        payload.due_date = Some("2024-5-1".into());
        let todo = new_todo(payload).unwrap();
        assert_eq!(todo.id, 1);
        assert_eq!(todo.status, Status::ToDo);
        assert_eq!(todo.due_date.to_string(), "2024-05-01");
    }

    #[test]
    fn new_todo_reports_missing_fields_in_order() {
        let mut payload = full_payload();
        payload.id = None;
        payload.category = None;
        let err = new_todo(payload).unwrap_err();
        assert_eq!(err, ValidationError::MissingField(Field::Id));
        assert_eq!(err.to_string(), "Missing Todo Id");

        let mut payload = full_payload();
        payload.due_date = None;
        assert_eq!(new_todo(payload).unwrap_err().to_string(), "Missing Due Date");
    }

    #[test]
    fn new_todo_checks_values_before_presence() {
        let payload = TodoPayload {
            status: Some("NOPE".into()),
            ..Default::default()
        };
        assert_eq!(new_todo(payload), Err(ValidationError::Status));
    }

    #[test]
    fn todo_patch_reports_first_present_field() {
        let payload = TodoPayload {
            todo: Some("Buy oat milk".into()),
            due_date: Some("2024-06-01".into()),
            ..Default::default()
        };
        let (patch, updated) = todo_patch(payload).unwrap();
        assert_eq!(updated, UpdatedField::Todo);
        assert_eq!(patch.todo.as_deref(), Some("Buy oat milk"));
        assert_eq!(patch.due_date.unwrap().to_string(), "2024-06-01");
    }

    #[test]
    fn todo_patch_rejects_empty_body() {
        let payload = TodoPayload {
            id: Some(7),
            ..Default::default()
        };
        assert_eq!(todo_patch(payload), Err(ValidationError::EmptyUpdate));
    }
}
