//! Untyped request body, split into explicitly tagged fields.
//!
//! JSON `null` is a present value, not an absent one: `{"completed": null}`
//! must fail validation while `{}` leaves the field untouched.

use serde_json::{Map, Value};

use crate::errors::{ApiError, ApiResult};

/// A single raw body field.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Field {
    #[default]
    Absent,
    Present(Value),
}

impl Field {
    fn take(map: &mut Map<String, Value>, key: &str) -> Self {
        match map.remove(key) {
            Some(value) => Self::Present(value),
            None => Self::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_present(&self) -> Option<&Value> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }
}

impl From<Option<Value>> for Field {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

/// Task fields as they arrived on the wire. Unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskInput {
    pub title: Field,
    pub completed: Field,
}

impl TaskInput {
    /// Split a JSON body into tagged fields. The body must be an object.
    pub fn from_json(body: Value) -> ApiResult<Self> {
        let Value::Object(mut map) = body else {
            return Err(ApiError::invalid_field(
                "body",
                "request body must be a JSON object",
            ));
        };
        Ok(Self {
            title: Field::take(&mut map, "title"),
            completed: Field::take(&mut map, "completed"),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_absent() && self.completed.is_absent()
    }
}
