use serde_json::{Map, Value};

/// Ticket fields a client may send back in a PATCH.
pub const WRITABLE_TICKET_FIELDS: &[&str] = &[
    "title",
    "description",
    "status",
    "section_id",
    "facility_id",
    "assigned_to_id",
    "pending_reason",
];

/// Server-owned ticket fields. Never part of an outgoing payload.
pub const READ_ONLY_TICKET_FIELDS: &[&str] = &[
    "id",
    "ticket_no",
    "raised_by",
    "assigned_to",
    "created_at",
    "updated_at",
    "resolved_at",
];

/// Pick the requested writable fields out of a ticket-shaped JSON object.
///
/// Requested names that are read-only or unknown are ignored. A nested
/// `assigned_to` object is flattened to `assigned_to_id` when that field is
/// requested and not already present.
pub fn extract_writable_fields(ticket: &Value, fields: &[&str]) -> Map<String, Value> {
    let mut out = Map::new();
    let Some(source) = ticket.as_object() else {
        return out;
    };

    for field in fields {
        if !WRITABLE_TICKET_FIELDS.contains(field) || out.contains_key(*field) {
            continue;
        }
        match source.get(*field) {
            Some(value) => {
                out.insert((*field).to_string(), value.clone());
            }
            None if *field == "assigned_to_id" => {
                if let Some(id) = source
                    .get("assigned_to")
                    .and_then(|a| a.get("id"))
                    .filter(|id| id.is_i64() || id.is_u64())
                {
                    out.insert("assigned_to_id".to_string(), id.clone());
                }
            }
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_ticket() -> Value {
        json!({
            "id": 4,
            "ticket_no": "TKT-00004",
            "title": "Flickering lights",
            "description": "Corridor B",
            "status": "assigned",
            "section": "Electrical",
            "section_id": 2,
            "facility": "Annex",
            "facility_id": 9,
            "raised_by": "alice",
            "assigned_to": { "id": 5, "username": "tech" },
            "created_at": "2024-03-01T09:00:00Z",
            "updated_at": "2024-03-01T10:00:00Z",
            "resolved_at": null,
        })
    }

    #[test]
    fn test_read_only_fields_never_extracted() {
        let mut requested: Vec<&str> = READ_ONLY_TICKET_FIELDS.to_vec();
        requested.extend_from_slice(WRITABLE_TICKET_FIELDS);
        let out = extract_writable_fields(&full_ticket(), &requested);
        for field in READ_ONLY_TICKET_FIELDS {
            assert!(!out.contains_key(*field), "{field} leaked into payload");
        }
    }

    #[test]
    fn test_picks_only_requested_fields() {
        let out = extract_writable_fields(&full_ticket(), &["title", "section_id"]);
        assert_eq!(Value::Object(out), json!({ "title": "Flickering lights", "section_id": 2 }));
    }

    #[test]
    fn test_assigned_to_object_flattens_to_id() {
        let out = extract_writable_fields(&full_ticket(), &["assigned_to_id"]);
        assert_eq!(out.get("assigned_to_id"), Some(&json!(5)));
    }

    #[test]
    fn test_non_object_input_yields_nothing() {
        assert!(extract_writable_fields(&json!([1, 2]), &["title"]).is_empty());
        assert!(extract_writable_fields(&json!(null), WRITABLE_TICKET_FIELDS).is_empty());
    }
}
