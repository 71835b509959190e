//! Filter shapes for the list endpoint.
//!
//! # Design
//! `FilterShape::classify` turns the presence pattern of the three optional
//! enum filters into exactly one variant. Each variant carries only the
//! values it filters on, so a shape can never reference a missing field.
//!
//! `FilterShape::predicate` renders the shape as a SQL `WHERE` body with
//! positional `?` placeholders. Every shape also carries the case-insensitive
//! substring match on the todo text. Values are returned separately for
//! binding; nothing is interpolated into the SQL text.

use crate::types::{Category, Priority, Status};
use crate::validate::ValidatedFields;

/// One mutually exclusive combination of list filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterShape {
    Unfiltered,
    Status(Status),
    Priority(Priority),
    Category(Category),
    StatusPriority(Status, Priority),
    StatusCategory(Status, Category),
    PriorityCategory(Priority, Category),
    StatusPriorityCategory(Status, Priority, Category),
}

/// A rendered `WHERE` body and the values bound to its placeholders, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub clause: String,
    pub values: Vec<String>,
}

impl FilterShape {
    pub fn classify(
        status: Option<Status>,
        priority: Option<Priority>,
        category: Option<Category>,
    ) -> Self {
        match (status, priority, category) {
            (None, None, None) => FilterShape::Unfiltered,
            (Some(s), None, None) => FilterShape::Status(s),
            (None, Some(p), None) => FilterShape::Priority(p),
            (None, None, Some(c)) => FilterShape::Category(c),
            (Some(s), Some(p), None) => FilterShape::StatusPriority(s, p),
            (Some(s), None, Some(c)) => FilterShape::StatusCategory(s, c),
            (None, Some(p), Some(c)) => FilterShape::PriorityCategory(p, c),
            (Some(s), Some(p), Some(c)) => FilterShape::StatusPriorityCategory(s, p, c),
        }
    }

    pub fn from_fields(fields: &ValidatedFields) -> Self {
        Self::classify(fields.status, fields.priority, fields.category)
    }

    /// Column/value pairs for the exact-match part of the shape.
    fn exact_matches(&self) -> Vec<(&'static str, &'static str)> {
        match *self {
            FilterShape::Unfiltered => vec![],
            FilterShape::Status(s) => vec![("status", s.as_str())],
            FilterShape::Priority(p) => vec![("priority", p.as_str())],
            FilterShape::Category(c) => vec![("category", c.as_str())],
            FilterShape::StatusPriority(s, p) => {
                vec![("status", s.as_str()), ("priority", p.as_str())]
            }
            FilterShape::StatusCategory(s, c) => {
                vec![("status", s.as_str()), ("category", c.as_str())]
            }
            FilterShape::PriorityCategory(p, c) => {
                vec![("priority", p.as_str()), ("category", c.as_str())]
            }
            FilterShape::StatusPriorityCategory(s, p, c) => vec![
                ("status", s.as_str()),
                ("priority", p.as_str()),
                ("category", c.as_str()),
            ],
        }
    }

    /// Render the shape for the `todo` table, matching `search_q` anywhere in
    /// the todo text. An empty `search_q` matches every row.
    pub fn predicate(&self, search_q: &str) -> Predicate {
        let mut conditions = vec![r"todo LIKE ? ESCAPE '\'".to_string()];
        let mut values = vec![format!("%{}%", escape_like(search_q))];

        for (column, value) in self.exact_matches() {
            conditions.push(format!("{column} = ?"));
            values.push(value.to_string());
        }

        Predicate {
            clause: conditions.join(" AND "),
            values,
        }
    }
}

/// Escape `LIKE` wildcards so the search text matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
