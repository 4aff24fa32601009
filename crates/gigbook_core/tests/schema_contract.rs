use gigbook_core::{
    ChecklistItem, ChecklistTemplate, Event, EventDraft, EventStatus, TemplateDraft, UserId,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use uuid::Uuid;

fn user() -> UserId {
    UserId::parse("auth0|abc").unwrap()
}

fn event() -> Event {
    let mut event = Event::from_draft(
        user(),
        &EventDraft {
            client_name: "Ana Souza".to_string(),
            client_phone: "11 99999-0000".to_string(),
            title: "Wedding".to_string(),
            event_type: Some("casamento".to_string()),
            date: "2026-11-20".to_string(),
            start_time: Some("18:30".to_string()),
            total_amount: Some("5000".to_string()),
            ..EventDraft::default()
        },
    )
    .unwrap();
    event.apply_payment(Decimal::from_str("2500.5").unwrap()).unwrap();
    event
}

#[test]
fn event_json_uses_persisted_field_names_and_codes() {
    let value = serde_json::to_value(event()).unwrap();
    let mut keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();

    assert_eq!(
        keys,
        vec![
            "client_name",
            "client_phone",
            "created_at",
            "date",
            "end_time",
            "id",
            "location",
            "notes",
            "paid_amount",
            "start_time",
            "status",
            "title",
            "total_amount",
            "type",
            "user_id",
        ]
    );
    assert_eq!(value["type"], json!("casamento"));
    assert_eq!(value["status"], json!("orcado"));
    assert_eq!(value["date"], json!("2026-11-20"));
    assert_eq!(value["start_time"], json!("18:30"));
    assert_eq!(value["end_time"], Value::Null);
    assert_eq!(value["user_id"], json!("auth0|abc"));
    assert_eq!(value["total_amount"].as_f64(), Some(5000.0));
    assert_eq!(value["paid_amount"].as_f64(), Some(2500.5));
}

#[test]
fn event_json_roundtrips() {
    let original = event();
    let text = serde_json::to_string(&original).unwrap();
    let parsed: Event = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, original);
}

#[test]
fn status_codes_match_stored_values() {
    let codes: Vec<Value> = EventStatus::ALL
        .iter()
        .map(|status| serde_json::to_value(status).unwrap())
        .collect();
    assert_eq!(
        codes,
        vec![
            json!("orcado"),
            json!("confirmado"),
            json!("concluido"),
            json!("cancelado")
        ]
    );
    let parsed: EventStatus = serde_json::from_value(json!("cancelado")).unwrap();
    assert_eq!(parsed, EventStatus::Cancelled);
}

#[test]
fn checklist_item_and_template_json_shapes() {
    let item = ChecklistItem::new(Uuid::new_v4(), "lenses", 2).unwrap();
    let value = serde_json::to_value(&item).unwrap();
    assert_eq!(value["description"], json!("lenses"));
    assert_eq!(value["is_done"], json!(false));
    assert_eq!(value["order"], json!(2));
    assert_eq!(value["event_id"], json!(item.event_id.to_string()));

    let template =
        ChecklistTemplate::from_draft(user(), &TemplateDraft::new("Basics", ["A", "B"])).unwrap();
    let value = serde_json::to_value(&template).unwrap();
    assert_eq!(value["name"], json!("Basics"));
    assert_eq!(value["items"], json!(["A", "B"]));
    assert_eq!(value["description"], Value::Null);
}
