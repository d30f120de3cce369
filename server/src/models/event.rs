use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A stored event. `date_time` always holds a valid instant; it is checked on
/// write and serialized in the canonical `YYYY-MM-DDTHH:mm:ss[.sss]Z` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "imgURL")]
    pub img_url: String,
    #[serde(rename = "dateTime", with = "canonical_date_time")]
    pub date_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/eventos`. Everything is optional here so that missing
/// fields reach validation and get a field-specific error instead of a
/// deserialization failure. `dateTime` and `category` are kept as raw JSON so
/// a non-string value is reported by the field rules with their hints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "imgURL")]
    pub img_url: Option<String>,
    #[serde(rename = "dateTime")]
    pub date_time: Option<Value>,
    pub category: Option<Value>,
}

/// Body of `PUT /api/eventos/:id`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "imgURL")]
    pub img_url: Option<String>,
    #[serde(rename = "dateTime")]
    pub date_time: Option<Value>,
    pub category: Option<Value>,
}

/// A validated event ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub category: String,
    pub img_url: String,
    pub date_time: DateTime<Utc>,
}

/// A validated partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub img_url: Option<String>,
    pub date_time: Option<DateTime<Utc>>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.img_url.is_none()
            && self.date_time.is_none()
    }

    /// Applies the supplied fields to `event` in place.
    pub fn apply_to(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(img_url) = self.img_url {
            event.img_url = img_url;
        }
        if let Some(date_time) = self.date_time {
            event.date_time = date_time;
        }
    }
}

/// Response body of `DELETE /api/eventos/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedEvent {
    pub message: String,
    pub deleted_record: Event,
}

/// Serde adapter for the wire form of `dateTime`.
pub mod canonical_date_time {
    use chrono::{DateTime, Timelike, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::validation::parse_date_time;

    pub fn format(value: &DateTime<Utc>) -> String {
        if value.nanosecond() == 0 {
            value.format("%Y-%m-%dT%H:%M:%SZ").to_string()
        } else {
            value.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
        }
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date_time(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid dateTime '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Event {
        Event {
            id: 7,
            title: "Workshop Express".to_string(),
            description: "Crea APIs REST con Express".to_string(),
            category: "tecnologia".to_string(),
            img_url: String::new(),
            date_time: Utc.with_ymd_and_hms(2025, 12, 20, 14, 30, 0).unwrap(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_event_serializes_wire_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["dateTime"], "2025-12-20T14:30:00Z");
        assert_eq!(json["imgURL"], "");
        assert!(json.get("date_time").is_none());
        assert!(json.get("created_at").is_some());
    }

    #[test]
    fn test_canonical_format_keeps_milliseconds() {
        let value = Utc.with_ymd_and_hms(2025, 12, 20, 14, 30, 0).unwrap()
            + chrono::Duration::milliseconds(250);
        assert_eq!(canonical_date_time::format(&value), "2025-12-20T14:30:00.250Z");
    }

    #[test]
    fn test_changes_apply_only_supplied_fields() {
        let mut event = sample();
        let before = event.clone();
        EventChanges {
            category: Some("ia".to_string()),
            ..Default::default()
        }
        .apply_to(&mut event);

        assert_eq!(event.category, "ia");
        assert_eq!(event.title, before.title);
        assert_eq!(event.date_time, before.date_time);
    }

    #[test]
    fn test_deleted_event_uses_camel_case() {
        let body = DeletedEvent {
            message: "Event deleted".to_string(),
            deleted_record: sample(),
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["deletedRecord"]["id"], 7);
    }
}
