//! Tagged serde helpers for cache payloads.
//!
//! Non-primitive values are wrapped with a `__type__` tag on serialize and
//! unwrapped on deserialize, so identifiers and timestamps survive the
//! round trip through the cache without type loss:
//!
//! ```json
//! {"__type__": "datetime", "value": "2026-01-05T12:00:00+00:00"}
//! {"__type__": "objectid", "value": "65f0c0ffee0123456789abcd"}
//! ```
//!
//! Deserialization rejects unknown fields and mismatched tags.

use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct TaggedRef<'a> {
    #[serde(rename = "__type__")]
    tag: &'static str,
    value: &'a str,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Tagged {
    #[serde(rename = "__type__")]
    tag: String,
    value: String,
}

/// `#[serde(with = ...)]` helper for `ObjectId` fields.
pub mod tagged_object_id {
    use mongodb::bson::oid::ObjectId;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Tagged, TaggedRef};

    pub fn serialize<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
        TaggedRef {
            tag: "objectid",
            value: &id.to_hex(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ObjectId, D::Error> {
        let tagged = Tagged::deserialize(deserializer)?;
        if tagged.tag != "objectid" {
            return Err(D::Error::custom(format!(
                "expected objectid tag, got {:?}",
                tagged.tag
            )));
        }
        ObjectId::parse_str(&tagged.value).map_err(D::Error::custom)
    }
}

/// `#[serde(with = ...)]` helper for `DateTime<Utc>` fields.
pub mod tagged_datetime {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Tagged, TaggedRef};

    pub fn serialize<S: Serializer>(
        dt: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        TaggedRef {
            tag: "datetime",
            value: &dt.to_rfc3339(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let tagged = Tagged::deserialize(deserializer)?;
        if tagged.tag != "datetime" {
            return Err(D::Error::custom(format!(
                "expected datetime tag, got {:?}",
                tagged.tag
            )));
        }
        DateTime::parse_from_rfc3339(&tagged.value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use mongodb::bson::oid::ObjectId;

    use crate::models::{CachedTask, TaskStatus};

    fn sample_task() -> CachedTask {
        CachedTask {
            id: ObjectId::new(),
            title: "write report".into(),
            description: "quarterly numbers".into(),
            status: TaskStatus::InProgress,
            due_date: Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
            user_id: ObjectId::new(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 1, 6, 8, 15, 0).unwrap(),
        }
    }

    #[test]
    fn round_trip_preserves_all_fields() {
        let task = sample_task();
        let raw = serde_json::to_string(&task).unwrap();
        let back: CachedTask = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn encoded_values_carry_type_tags() {
        let task = sample_task();
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&task).unwrap()).unwrap();
        assert_eq!(value["id"]["__type__"], "objectid");
        assert_eq!(value["due_date"]["__type__"], "datetime");
        assert_eq!(value["id"]["value"], task.id.to_hex());
    }

    #[test]
    fn mismatched_tag_is_rejected() {
        let mut value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&sample_task()).unwrap()).unwrap();
        value["id"]["__type__"] = "datetime".into();
        assert!(serde_json::from_value::<CachedTask>(value).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&sample_task()).unwrap()).unwrap();
        value["injected"] = "__import__('os')".into();
        assert!(serde_json::from_value::<CachedTask>(value).is_err());
    }

    #[test]
    fn untagged_datetime_is_rejected() {
        let mut value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&sample_task()).unwrap()).unwrap();
        value["due_date"] = "2026-03-01T09:30:00Z".into();
        assert!(serde_json::from_value::<CachedTask>(value).is_err());
    }
}
