//! Domain types for the todo service.
//!
//! # Design
//! The three enumerated fields are closed Rust enums whose wire spelling is
//! the exact upper-case text the service accepts (`"TO DO"`, `"IN PROGRESS"`,
//! ...). Parsing is case-sensitive. `DueDate` wraps a `chrono::NaiveDate` and
//! always renders as `yyyy-MM-dd`, which is also how it is stored.
//!
//! Request bodies and query strings arrive unparsed (`TodoPayload`,
//! `TodoQuery`) so that an unknown enum value, a `null`, or a value of the
//! wrong JSON type surfaces as a validation error with a specific message
//! instead of a generic deserialization failure.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Returned by the `FromStr` impls when text is not a recognized value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {field} value: {value:?}")]
pub struct UnknownValue {
    pub field: &'static str,
    pub value: String,
}

impl UnknownValue {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "LOW")]
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl FromStr for Priority {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HIGH" => Ok(Priority::High),
            "MEDIUM" => Ok(Priority::Medium),
            "LOW" => Ok(Priority::Low),
            other => Err(UnknownValue::new("priority", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "TO DO")]
    ToDo,
    #[serde(rename = "IN PROGRESS")]
    InProgress,
    #[serde(rename = "DONE")]
    Done,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::ToDo => "TO DO",
            Status::InProgress => "IN PROGRESS",
            Status::Done => "DONE",
        }
    }
}

impl FromStr for Status {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TO DO" => Ok(Status::ToDo),
            "IN PROGRESS" => Ok(Status::InProgress),
            "DONE" => Ok(Status::Done),
            other => Err(UnknownValue::new("status", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "WORK")]
    Work,
    #[serde(rename = "HOME")]
    Home,
    #[serde(rename = "LEARNING")]
    Learning,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "WORK",
            Category::Home => "HOME",
            Category::Learning => "LEARNING",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WORK" => Ok(Category::Work),
            "HOME" => Ok(Category::Home),
            "LEARNING" => Ok(Category::Learning),
            other => Err(UnknownValue::new("category", other)),
        }
    }
}

/// A calendar date normalized to `yyyy-MM-dd`.
///
/// Accepts `yyyy-MM-dd` (month and day may be unpadded), `yyyy/MM/dd`, or an
/// RFC 3339 timestamp whose date part is kept as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueDate(NaiveDate);

impl DueDate {
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// Convenience constructor; `None` for an impossible date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }
}

impl FromStr for DueDate {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        NaiveDate::parse_from_str(input, Self::FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(input, "%Y/%m/%d"))
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(input)
                    .ok()
                    .map(|dt| dt.date_naive())
            })
            .map(Self)
            .ok_or_else(|| UnknownValue::new("dueDate", s))
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DueDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A stored todo as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub todo: String,
    pub priority: Priority,
    pub status: Status,
    pub category: Category,
    pub due_date: DueDate,
}

impl Todo {
    /// Overwrite every field present in `patch`; absent fields keep their
    /// current value.
    pub fn apply(&mut self, patch: TodoPatch) {
        if let Some(todo) = patch.todo {
            self.todo = todo;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
    }
}

/// Typed partial update. Serializes to the same JSON shape the update
/// endpoint accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DueDate>,
}

/// The field an update reports as changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatedField {
    Status,
    Priority,
    Category,
    Todo,
    DueDate,
}

impl fmt::Display for UpdatedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpdatedField::Status => "Status",
            UpdatedField::Priority => "Priority",
            UpdatedField::Category => "Category",
            UpdatedField::Todo => "Todo",
            UpdatedField::DueDate => "Due Date",
        };
        f.write_str(label)
    }
}

impl TodoPatch {
    /// First present field in the order status, priority, category, todo,
    /// due date. Later fields are still applied but never reported.
    pub fn updated_field(&self) -> Option<UpdatedField> {
        if self.status.is_some() {
            Some(UpdatedField::Status)
        } else if self.priority.is_some() {
            Some(UpdatedField::Priority)
        } else if self.category.is_some() {
            Some(UpdatedField::Category)
        } else if self.todo.is_some() {
            Some(UpdatedField::Todo)
        } else if self.due_date.is_some() {
            Some(UpdatedField::DueDate)
        } else {
            None
        }
    }
}

/// Create/update body before validation.
///
/// The four checked fields keep whatever JSON the caller sent. A field that
/// is absent is `None`; a field sent as `null`, a number, or any other
/// non-string is `Some` and fails validation with that field's message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub priority: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)` instead of folding it
/// into `None`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Query string of the list and agenda endpoints before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoQuery {
    pub search_q: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
}

/// Typed list filter used by `TodoClient::build_list_todos`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub search_q: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
}
