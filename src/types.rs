//! Records persisted in the gallery's JSON documents.
//!
//! These are read by the gallery website as-is, so field names and field
//! order are part of the on-disk format.

use serde::{Deserialize, Serialize};

/// One entry of the event index (`events.json`).
///
/// Fields serialize in declaration order: `id`, `name`, `date`, `description`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Stable key: names the photo directory and the photo-list document
    pub id: String,
    /// Display name
    pub name: String,
    /// `YYYY-MM-DD`, kept as given
    pub date: String,
    pub description: String,
}

/// Ordered filenames of one event's photos (`<event_id>.json`).
pub type PhotoList = Vec<String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_fields_in_order() {
        let event = Event {
            id: "20250801-event".into(),
            name: "Summer Festival".into(),
            date: "2025-08-01".into(),
            description: "Fireworks".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"id":"20250801-event","name":"Summer Festival","date":"2025-08-01","description":"Fireworks"}"#
        );
    }

    #[test]
    fn event_parses_from_index_entry() {
        let json = r#"{"id": "20250501-spring-marche", "name": "春のマルシェ", "date": "2025-05-01", "description": "春のマルシェの写真です。"}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, "20250501-spring-marche");
        assert_eq!(event.name, "春のマルシェ");
    }
}
