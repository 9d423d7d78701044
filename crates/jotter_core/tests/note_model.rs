use jotter_core::{Note, NoteSummary};

#[test]
fn note_serialization_uses_expected_wire_fields() {
    let note = Note {
        id: 7,
        title: "Plans".to_string(),
        content: "- ship it".to_string(),
        updated_at: 1_700_000_360_000,
        created_at: 1_700_000_000_000,
    };

    let json = serde_json::to_value(&note).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["title"], "Plans");
    assert_eq!(json["content"], "- ship it");
    assert_eq!(json["updated_at"], 1_700_000_360_000_i64);
    assert_eq!(json["created_at"], 1_700_000_000_000_i64);
    assert!(json.get("rendered_body").is_none());

    let decoded: Note = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, note);
}

#[test]
fn summary_projects_id_and_title_only() {
    let note = Note {
        id: 3,
        title: "Short".to_string(),
        content: "long body".repeat(100),
        updated_at: 2,
        created_at: 1,
    };

    let summary = note.summary();
    assert_eq!(
        summary,
        NoteSummary {
            id: 3,
            title: "Short".to_string()
        }
    );
    let json = serde_json::to_value(&summary).unwrap();
    assert!(json.get("content").is_none());
}
