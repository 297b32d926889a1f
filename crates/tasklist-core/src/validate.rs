//! Pure validators turning raw request input into typed values.
//!
//! Every failure is an [`ApiError::InvalidArgument`] carrying the offending
//! field name in its details.

use serde_json::Value;

use crate::errors::{ApiError, ApiResult};
use crate::input::Field;

pub const TITLE_MAX_LENGTH: usize = 255;

/// Parse a path segment into a positive task id.
pub fn parse_task_id(raw: &str) -> ApiResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::invalid_field(
            "id",
            "Task id must be a positive integer",
        )),
    }
}

/// Require a string title, trimmed, non-empty and at most 255 characters.
///
/// Length is measured in UTF-16 code units, so a character outside the BMP
/// (most emoji) counts as two.
pub fn require_title(raw: &Field) -> ApiResult<String> {
    let Some(Value::String(raw)) = raw.as_present() else {
        return Err(ApiError::invalid_field("title", "title must be a string"));
    };
    let title = raw.trim();
    if title.is_empty() {
        return Err(ApiError::invalid_field("title", "title is required"));
    }
    if title.encode_utf16().count() > TITLE_MAX_LENGTH {
        return Err(ApiError::invalid_field(
            "title",
            format!("title must be <= {TITLE_MAX_LENGTH} characters"),
        ));
    }
    Ok(title.to_string())
}

/// `None` when the field was not sent, otherwise the same rules as [`require_title`].
pub fn optional_title(raw: &Field) -> ApiResult<Option<String>> {
    if raw.is_absent() {
        return Ok(None);
    }
    require_title(raw).map(Some)
}

fn completed_missing() -> ApiError {
    ApiError::invalid_field("completed", "completed is required")
}

fn completed_value(value: &Value) -> ApiResult<bool> {
    coerce_completed(value)
        .ok_or_else(|| ApiError::invalid_field("completed", "completed must be a boolean value"))
}

/// Parse the completion flag.
///
/// An absent field is an error only when `required` is set. Present values
/// go through [`coerce_completed`].
pub fn parse_completed(raw: &Field, required: bool) -> ApiResult<Option<bool>> {
    match raw.as_present() {
        Some(value) => completed_value(value).map(Some),
        None if required => Err(completed_missing()),
        None => Ok(None),
    }
}

/// The completion flag of a full replacement, where it must be sent.
pub fn require_completed(raw: &Field) -> ApiResult<bool> {
    match raw.as_present() {
        Some(value) => completed_value(value),
        None => Err(completed_missing()),
    }
}

/// The complete coercion table for the completion flag.
///
/// | input            | result  |
/// |------------------|---------|
/// | `true` / `false` | itself  |
/// | `1` / `"1"`      | `true`  |
/// | `0` / `"0"`      | `false` |
///
/// Anything else, including `null`, is rejected.
pub fn coerce_completed(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(x) if x == 1.0 => Some(true),
            Some(x) if x == 0.0 => Some(false),
            _ => None,
        },
        Value::String(s) => match s.as_str() {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;
    use serde_json::json;

    fn present(value: Value) -> Field {
        Field::Present(value)
    }

    fn field_of(err: &ApiError) -> &str {
        err.client_details()
            .and_then(|d| d.get("field"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    #[test]
    fn task_id_accepts_positive_integers() {
        assert_eq!(parse_task_id("1").unwrap(), 1);
        assert_eq!(parse_task_id("42").unwrap(), 42);
    }

    #[test]
    fn task_id_rejects_everything_else() {
        for raw in ["0", "-3", "abc", "", "1.5", "12abc", "99999999999999999999"] {
            let err = parse_task_id(raw).unwrap_err();
            assert_eq!(err.status_code(), 400, "input: {raw:?}");
            assert_eq!(field_of(&err), "id");
        }
    }

    #[test]
    fn title_trimmed() {
        assert_eq!(require_title(&present(json!("  buy milk \n"))).unwrap(), "buy milk");
        assert_eq!(require_title(&present(json!("a"))).unwrap(), "a");
    }

    #[test]
    fn title_failures() {
        let cases = [
            present(json!("")),
            present(json!("   ")),
            present(json!("x".repeat(256))),
            present(json!(12)),
            present(Value::Null),
            Field::Absent,
        ];
        for raw in cases {
            let err = require_title(&raw).unwrap_err();
            assert_eq!(err.status_code(), 400, "input: {raw:?}");
            assert_eq!(field_of(&err), "title");
        }
    }

    #[test]
    fn title_limit_counts_utf16_units() {
        let emoji = "\u{1F600}";
        let at_limit = format!("{}x", emoji.repeat(127));
        assert_eq!(require_title(&present(json!(at_limit))).unwrap(), at_limit);

        let over = emoji.repeat(128);
        assert_matches!(
            require_title(&present(json!(over))),
            Err(ApiError::InvalidArgument { message, .. }) if message == "title must be <= 255 characters"
        );
        assert!(require_title(&present(json!(emoji.repeat(200)))).is_err());
    }

    #[test]
    fn title_limit_applies_after_trim() {
        let exact = "é".repeat(TITLE_MAX_LENGTH);
        assert_eq!(require_title(&present(json!(exact))).unwrap(), exact);

        let padded = format!("   {}   ", "x".repeat(TITLE_MAX_LENGTH));
        assert_eq!(require_title(&present(json!(padded))).unwrap().len(), TITLE_MAX_LENGTH);
    }

    #[test]
    fn title_error_messages() {
        assert_matches!(
            require_title(&Field::Absent),
            Err(ApiError::InvalidArgument { message, .. }) if message == "title must be a string"
        );
        assert_matches!(
            require_title(&present(json!(" "))),
            Err(ApiError::InvalidArgument { message, .. }) if message == "title is required"
        );
        assert_matches!(
            require_title(&present(json!("x".repeat(300)))),
            Err(ApiError::InvalidArgument { message, .. }) if message == "title must be <= 255 characters"
        );
    }

    #[test]
    fn optional_title_absent() {
        assert_eq!(optional_title(&Field::Absent).unwrap(), None);
        assert_eq!(optional_title(&present(json!(" x "))).unwrap().as_deref(), Some("x"));
        assert!(optional_title(&present(Value::Null)).is_err());
    }

    #[test]
    fn completed_coercion_table() {
        let accepted = [
            (json!(true), true),
            (json!(false), false),
            (json!(1), true),
            (json!(0), false),
            (json!("1"), true),
            (json!("0"), false),
        ];
        for (raw, expected) in accepted {
            assert_eq!(parse_completed(&present(raw), false).unwrap(), Some(expected));
        }
    }

    #[test]
    fn completed_rejections() {
        for raw in [
            Value::Null,
            json!("yes"),
            json!("true"),
            json!(2),
            json!(-1),
            json!(0.5),
            json!(""),
            json!([]),
            json!({}),
        ] {
            let err = parse_completed(&present(raw.clone()), false).unwrap_err();
            assert_eq!(err.status_code(), 400, "input: {raw}");
            assert_eq!(field_of(&err), "completed");
        }
    }

    #[test]
    fn completed_absent() {
        assert_eq!(parse_completed(&Field::Absent, false).unwrap(), None);
        assert_matches!(
            parse_completed(&Field::Absent, true),
            Err(ApiError::InvalidArgument { message, .. }) if message == "completed is required"
        );
    }

    #[test]
    fn require_completed_matches_required_parse() {
        assert!(require_completed(&present(json!("1"))).unwrap());
        assert!(!require_completed(&present(json!(false))).unwrap());
        assert_matches!(
            require_completed(&Field::Absent),
            Err(ApiError::InvalidArgument { message, .. }) if message == "completed is required"
        );
        assert_matches!(
            require_completed(&present(Value::Null)),
            Err(ApiError::InvalidArgument { message, .. }) if message == "completed must be a boolean value"
        );
    }

    proptest! {
        #[test]
        fn valid_titles_round_trip_trimmed(
            core in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,250}[a-zA-Z0-9]|[a-zA-Z0-9]",
            pad in " {0,5}",
        ) {
            let raw = format!("{pad}{core}{pad}");
            let title = require_title(&present(json!(raw))).unwrap();
            prop_assert_eq!(title, core.trim());
        }

        #[test]
        fn overlong_titles_rejected(len in 256usize..600) {
            let raw = "t".repeat(len);
            prop_assert!(require_title(&present(json!(raw))).is_err());
        }

        #[test]
        fn integers_other_than_zero_and_one_rejected(n in any::<i64>()) {
            prop_assume!(n != 0 && n != 1);
            prop_assert!(parse_completed(&present(json!(n)), false).is_err());
        }

        #[test]
        fn positive_ids_parse(id in 1i64..=i64::MAX) {
            prop_assert_eq!(parse_task_id(&id.to_string()).unwrap(), id);
        }
    }
}
