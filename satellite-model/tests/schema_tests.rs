use pretty_assertions::assert_eq;
use satellite_model::{
    db_schema, DbSchema, FieldRule, FieldType, TableSchema, ITEMS_TABLE, OTHER_ITEMS_TABLE,
};

// ── FieldRule constructors ───────────────────────────────────────

#[test]
fn text_field_is_required() {
    let f = FieldRule::text("content");
    assert_eq!(f.name, "content");
    assert_eq!(f.field_type, FieldType::Text);
    assert!(!f.optional);
}

#[test]
fn optional_text_field_is_optional() {
    let f = FieldRule::optional_text("content_text_null");
    assert_eq!(f.field_type, FieldType::Text);
    assert!(f.optional);
}

#[test]
fn optional_integer_field_is_optional() {
    let f = FieldRule::optional_integer("n");
    assert_eq!(f.field_type, FieldType::Integer);
    assert!(f.optional);
}

// ── FieldType ────────────────────────────────────────────────────

#[test]
fn field_type_sql_affinity() {
    assert_eq!(FieldType::Text.sql_type(), "TEXT");
    assert_eq!(FieldType::Integer.sql_type(), "INTEGER");
}

#[test]
fn integer_normalize_rewrites_whole_floats_only() {
    use serde_json::json;
    assert_eq!(FieldType::Integer.normalize(json!(2.0)), json!(2));
    assert_eq!(FieldType::Integer.normalize(json!(-7)), json!(-7));
    assert_eq!(FieldType::Integer.normalize(json!(null)), json!(null));
    assert_eq!(FieldType::Text.normalize(json!("2.0")), json!("2.0"));
}

#[test]
fn field_type_serializes_snake_case() {
    let json = serde_json::to_string(&FieldType::Integer).unwrap();
    assert_eq!(json, r#""integer""#);
}

// ── Registry ─────────────────────────────────────────────────────

#[test]
fn registry_has_both_tables() {
    let schema = db_schema();
    assert_eq!(schema.len(), 2);
    assert!(schema.table(ITEMS_TABLE).is_some());
    assert!(schema.table(OTHER_ITEMS_TABLE).is_some());
    assert!(schema.table("missing").is_none());
}

#[test]
fn items_fields_in_declaration_order() {
    let items = db_schema().table(ITEMS_TABLE).unwrap();
    let names: Vec<&str> = items.field_names().collect();
    assert_eq!(
        names,
        vec![
            "id",
            "content",
            "content_text_null",
            "content_text_null_default",
            "intvalue_null",
            "intvalue_null_default",
        ]
    );
}

#[test]
fn other_items_fields() {
    let other = db_schema().table(OTHER_ITEMS_TABLE).unwrap();
    let names: Vec<&str> = other.field_names().collect();
    assert_eq!(names, vec!["id", "content"]);
    assert!(other.fields.iter().all(|f| !f.optional));
}

#[test]
fn registry_is_shared() {
    assert!(std::ptr::eq(db_schema(), db_schema()));
}

#[test]
fn with_table_replaces_same_name() {
    let schema = DbSchema::new()
        .with_table(TableSchema::new("t", vec![FieldRule::text("a")]))
        .with_table(TableSchema::new("t", vec![FieldRule::text("b")]));
    assert_eq!(schema.len(), 1);
    assert!(schema.table("t").unwrap().field("b").is_some());
}

#[test]
fn tables_iterate_in_name_order() {
    let names: Vec<&str> = db_schema().tables().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["items", "other_items"]);
}
