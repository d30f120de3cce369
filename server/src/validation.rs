//! Field rules for event writes.
//!
//! Every create and update goes through [`validate_new_event`] or
//! [`validate_changes`] before it reaches a persistence backend, so a backend
//! never sees a title, date or category that failed these checks.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use regex::Regex;
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::{CreateEventRequest, EventChanges, NewEvent, UpdateEventRequest};

pub const DATE_TIME_PATTERN: &str = "YYYY-MM-DDTHH:mm:ss[.sss]Z";
pub const DATE_TIME_EXAMPLE: &str = "2025-10-16T10:00:00Z";

pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "tecnologia",
    "ciberseguridad",
    "ia",
    "conferencias",
    "anime",
    "deportes",
    "musica",
    "educacion",
];

static CANONICAL_DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]{3})?Z$")
        .expect("canonical date-time pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,

    #[error("dateTime is required")]
    MissingDateTime,

    #[error(
        "invalid dateTime '{value}': expected {} (example: {})",
        DATE_TIME_PATTERN,
        DATE_TIME_EXAMPLE
    )]
    InvalidDateTime { value: String },

    #[error("category is required")]
    MissingCategory { allowed: Vec<String> },

    #[error("invalid category '{value}'")]
    InvalidCategory { value: String, allowed: Vec<String> },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingTitle
            | ValidationError::MissingDateTime
            | ValidationError::MissingCategory { .. } => "MISSING_FIELD",
            ValidationError::InvalidDateTime { .. } | ValidationError::InvalidCategory { .. } => {
                "INVALID_FIELD"
            }
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingTitle => "title",
            ValidationError::MissingDateTime | ValidationError::InvalidDateTime { .. } => {
                "dateTime"
            }
            ValidationError::MissingCategory { .. } | ValidationError::InvalidCategory { .. } => {
                "category"
            }
        }
    }

    /// Structured hints returned to the client alongside the message.
    pub fn details(&self) -> Value {
        match self {
            ValidationError::MissingTitle => json!({ "field": self.field() }),
            ValidationError::MissingDateTime | ValidationError::InvalidDateTime { .. } => json!({
                "field": self.field(),
                "expectedFormat": DATE_TIME_PATTERN,
                "example": DATE_TIME_EXAMPLE,
            }),
            ValidationError::MissingCategory { allowed }
            | ValidationError::InvalidCategory { allowed, .. } => json!({
                "field": self.field(),
                "allowedCategories": allowed,
            }),
        }
    }
}

/// The ordered set of accepted category tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryWhitelist {
    tags: Vec<String>,
}

impl CategoryWhitelist {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for tag in tags.into_iter().map(Into::into) {
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        Self { tags: unique }
    }

    /// Parses a comma-separated list, skipping blank entries.
    pub fn from_csv(raw: &str) -> Self {
        Self::new(raw.split(',').map(str::trim).filter(|tag| !tag.is_empty()))
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.tags.iter().any(|tag| tag == candidate)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.tags.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for CategoryWhitelist {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORIES)
    }
}

impl FromStr for CategoryWhitelist {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_csv(s))
    }
}

/// Parses a canonical `YYYY-MM-DDTHH:mm:ss[.sss]Z` string into an instant.
///
/// Returns `None` when the shape does not match or when the components do not
/// name a real date and time. Leap seconds (`:60`) are rejected.
pub fn parse_date_time(input: &str) -> Option<DateTime<Utc>> {
    if !CANONICAL_DATE_TIME.is_match(input) {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.fZ").ok()?;
    if naive.nanosecond() >= 1_000_000_000 {
        return None;
    }

    Some(naive.and_utc())
}

pub fn validate_date_time(input: &str) -> bool {
    parse_date_time(input).is_some()
}

pub fn validate_category(input: &str, whitelist: &CategoryWhitelist) -> bool {
    whitelist.contains(input)
}

/// An empty string counts as absent.
fn supplied(value: Option<Value>) -> Option<Value> {
    value.filter(|v| v.as_str() != Some(""))
}

/// The string inside a JSON value, or the value's JSON text when it is not a
/// string.
fn into_text(value: Value) -> Result<String, String> {
    match value {
        Value::String(text) => Ok(text),
        other => Err(other.to_string()),
    }
}

fn check_date_time(value: Value) -> Result<DateTime<Utc>, ValidationError> {
    let value = into_text(value).map_err(|value| ValidationError::InvalidDateTime { value })?;
    parse_date_time(&value).ok_or(ValidationError::InvalidDateTime { value })
}

fn check_category(value: Value, whitelist: &CategoryWhitelist) -> Result<String, ValidationError> {
    match into_text(value) {
        Ok(value) if validate_category(&value, whitelist) => Ok(value),
        Ok(value) | Err(value) => Err(ValidationError::InvalidCategory {
            value,
            allowed: whitelist.to_vec(),
        }),
    }
}

fn check_title(value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingTitle)
    } else {
        Ok(value)
    }
}

/// Checks a create request. Rules run in a fixed order (title, date, category)
/// and the first failure is reported.
pub fn validate_new_event(
    request: CreateEventRequest,
    whitelist: &CategoryWhitelist,
) -> Result<NewEvent, ValidationError> {
    let title = check_title(request.title.unwrap_or_default())?;

    let date_time = supplied(request.date_time).ok_or(ValidationError::MissingDateTime)?;
    let date_time = check_date_time(date_time)?;

    let category = supplied(request.category).ok_or_else(|| ValidationError::MissingCategory {
        allowed: whitelist.to_vec(),
    })?;
    let category = check_category(category, whitelist)?;

    Ok(NewEvent {
        title,
        description: request.description.unwrap_or_default(),
        category,
        img_url: request.img_url.unwrap_or_default(),
        date_time,
    })
}

/// Checks an update request. Only supplied fields are checked, each with the
/// same rule used on create.
pub fn validate_changes(
    request: UpdateEventRequest,
    whitelist: &CategoryWhitelist,
) -> Result<EventChanges, ValidationError> {
    Ok(EventChanges {
        title: request.title.map(check_title).transpose()?,
        description: request.description,
        category: request
            .category
            .map(|c| check_category(c, whitelist))
            .transpose()?,
        img_url: request.img_url,
        date_time: request.date_time.map(check_date_time).transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create(title: &str, date_time: &str, category: &str) -> CreateEventRequest {
        CreateEventRequest {
            title: Some(title.to_string()),
            date_time: Some(date_time.into()),
            category: Some(category.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_date_time_accepts_canonical_forms() {
        assert!(validate_date_time("2025-02-28T10:00:00Z"));
        assert!(validate_date_time("2025-10-16T10:00:00.123Z"));
        assert!(validate_date_time("2024-02-29T23:59:59Z"));
    }

    #[test]
    fn test_date_time_rejects_impossible_calendar_values() {
        assert!(!validate_date_time("2025-02-30T10:00:00Z"));
        assert!(!validate_date_time("2025-13-01T00:00:00Z"));
        assert!(!validate_date_time("2025-01-32T00:00:00Z"));
        assert!(!validate_date_time("2025-02-29T00:00:00Z"));
        assert!(!validate_date_time("2025-01-01T24:00:00Z"));
        assert!(!validate_date_time("2025-01-01T10:60:00Z"));
        assert!(!validate_date_time("2025-06-30T23:59:60Z"));
    }

    #[test]
    fn test_date_time_rejects_other_shapes() {
        for input in [
            "",
            "2025-10-16",
            "2025-10-16T10:00:00",
            "2025-10-16T10:00Z",
            "2025-10-16 10:00:00Z",
            "2025-10-16T10:00:00+00:00",
            "2025-10-16T10:00:00.1Z",
            "2025-10-16T10:00:00.123456Z",
            "25-10-16T10:00:00Z",
            "2025-10-16T10:00:00z",
            " 2025-10-16T10:00:00Z",
            "２０２５-10-16T10:00:00Z",
        ] {
            assert!(!validate_date_time(input), "{input:?} should be rejected");
        }
    }

    #[test]
    fn test_parse_date_time_keeps_milliseconds() {
        let parsed = parse_date_time("2025-10-16T10:00:00.500Z").unwrap();
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2025, 10, 16, 10, 0, 0).unwrap()
                + chrono::Duration::milliseconds(500)
        );
    }

    #[test]
    fn test_category_membership_is_exact() {
        let whitelist = CategoryWhitelist::default();
        assert!(validate_category("anime", &whitelist));
        assert!(!validate_category("Anime", &whitelist));
        assert!(!validate_category("anime ", &whitelist));
        assert!(!validate_category("", &whitelist));
    }

    #[test]
    fn test_whitelist_from_str_trims_and_dedups() {
        let whitelist: CategoryWhitelist = " gaming, holiday,,gaming ".parse().unwrap();
        assert_eq!(whitelist.as_slice(), ["gaming", "holiday"]);
    }

    #[test]
    fn test_new_event_defaults_optional_fields() {
        let event = validate_new_event(
            create("Conferencia Node.js", "2025-12-16T10:00:00Z", "conferencias"),
            &CategoryWhitelist::default(),
        )
        .unwrap();
        assert_eq!(event.description, "");
        assert_eq!(event.img_url, "");
        assert_eq!(event.category, "conferencias");
    }

    #[test]
    fn test_new_event_reports_first_failure_in_order() {
        let whitelist = CategoryWhitelist::default();

        let err = validate_new_event(CreateEventRequest::default(), &whitelist).unwrap_err();
        assert_eq!(err, ValidationError::MissingTitle);

        let err = validate_new_event(create("   ", "bad", "nope"), &whitelist).unwrap_err();
        assert_eq!(err, ValidationError::MissingTitle);

        let mut request = create("x", "", "nope");
        request.date_time = None;
        let err = validate_new_event(request, &whitelist).unwrap_err();
        assert_eq!(err, ValidationError::MissingDateTime);

        let err = validate_new_event(create("x", "2025-13-01T00:00:00Z", "nope"), &whitelist)
            .unwrap_err();
        assert_eq!(err.field(), "dateTime");
        assert!(matches!(err, ValidationError::InvalidDateTime { .. }));

        let err =
            validate_new_event(create("x", "2025-12-01T00:00:00Z", ""), &whitelist).unwrap_err();
        assert!(matches!(err, ValidationError::MissingCategory { .. }));

        let err = validate_new_event(create("x", "2025-12-01T00:00:00Z", "Gaming"), &whitelist)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidCategory {
                value: "Gaming".to_string(),
                allowed: whitelist.to_vec(),
            }
        );
    }

    #[test]
    fn test_changes_check_only_supplied_fields() {
        let whitelist = CategoryWhitelist::default();

        let changes = validate_changes(
            UpdateEventRequest {
                category: Some("ia".into()),
                ..Default::default()
            },
            &whitelist,
        )
        .unwrap();
        assert_eq!(changes.category.as_deref(), Some("ia"));
        assert!(changes.title.is_none());
        assert!(changes.date_time.is_none());

        assert!(validate_changes(UpdateEventRequest::default(), &whitelist)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_changes_reject_invalid_supplied_fields() {
        let whitelist = CategoryWhitelist::default();

        let err = validate_changes(
            UpdateEventRequest {
                date_time: Some("".into()),
                ..Default::default()
            },
            &whitelist,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDateTime { .. }));

        let err = validate_changes(
            UpdateEventRequest {
                title: Some(String::new()),
                ..Default::default()
            },
            &whitelist,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingTitle);

        let err = validate_changes(
            UpdateEventRequest {
                category: Some("holiday".into()),
                ..Default::default()
            },
            &whitelist,
        )
        .unwrap_err();
        assert_eq!(err.field(), "category");
    }

    #[test]
    fn test_non_string_values_get_field_errors() {
        let whitelist = CategoryWhitelist::default();

        let mut request = create("Concierto", "2025-12-16T10:00:00Z", "musica");
        request.category = Some(json!(5));
        assert_eq!(
            validate_new_event(request, &whitelist).unwrap_err(),
            ValidationError::InvalidCategory {
                value: "5".to_string(),
                allowed: whitelist.to_vec(),
            }
        );

        let mut request = create("Concierto", "2025-12-16T10:00:00Z", "musica");
        request.date_time = Some(json!(20251216));
        assert_eq!(
            validate_new_event(request, &whitelist).unwrap_err(),
            ValidationError::InvalidDateTime {
                value: "20251216".to_string(),
            }
        );

        let err = validate_changes(
            UpdateEventRequest {
                category: Some(json!(["musica"])),
                ..Default::default()
            },
            &whitelist,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCategory { .. }));
    }

    #[test]
    fn test_details_carry_hints() {
        let whitelist = CategoryWhitelist::new(["a", "b"]);
        let err = ValidationError::InvalidCategory {
            value: "c".to_string(),
            allowed: whitelist.to_vec(),
        };
        assert_eq!(err.details()["allowedCategories"], json!(["a", "b"]));

        let err = ValidationError::InvalidDateTime {
            value: "x".to_string(),
        };
        assert_eq!(err.details()["expectedFormat"], DATE_TIME_PATTERN);
        assert_eq!(err.details()["example"], DATE_TIME_EXAMPLE);
    }
}
