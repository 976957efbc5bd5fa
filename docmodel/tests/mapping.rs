//! End-to-end tests of the mapping layer against the in-memory store.

use docmodel::{memory::MemoryConnection, prelude::*, wire};
use bson::{Bson, bson, doc};

fn person() -> std::sync::Arc<Schema> {
    Schema::builder("Person")
        .field("name", Field::text(""))
        .field("age", Field::integer(0))
        .build()
}

#[test]
fn save_query_and_delete_round_trip() {
    let schema = person();
    let conn = MemoryConnection::new();
    schema.create_table(&conn).unwrap();

    let mut ann = Instance::with_values(&schema, [("name", "Ann")]).unwrap();
    ann.set("age", 30).unwrap();
    let summary = ann.save(&conn).unwrap();
    assert_eq!(summary.inserted, 1);
    // The store assigned a key and the instance adopted it.
    assert_ne!(ann.primary_key(), &Bson::Null);

    let found = schema
        .objects()
        .filter(Filter::eq("name", "Ann"))
        .get(&conn)
        .unwrap();
    assert_eq!(found.get("age").unwrap(), &bson!(30));
    assert_eq!(found.primary_key(), ann.primary_key());

    let summary = found.delete(&conn).unwrap().unwrap();
    assert_eq!(summary.deleted, 1);
    assert_eq!(schema.objects().count(&conn).unwrap(), 0);
}

#[test]
fn declared_order_with_injected_pk() {
    let schema = person();
    let ann = Instance::with_values(&schema, [("name", "Ann")]).unwrap();
    let items = ann.items();
    assert_eq!(items[0], ("pk", &Bson::Null));
    assert_eq!(items[1], ("name", &bson!("Ann")));
    assert_eq!(items[2], ("age", &bson!(0i64)));
}

#[test]
fn saving_an_ill_typed_field_never_reaches_the_store() {
    let schema = person();
    let conn = MemoryConnection::new();

    let mut ann = Instance::new(&schema);
    let err = ann.set("name", 5).unwrap_err();
    assert!(matches!(err, ModelError::Validation { .. }));

    // The failed write left nothing behind; the instance still saves clean.
    ann.set("name", "Ann").unwrap();
    ann.save(&conn).unwrap();
    assert_eq!(schema.objects().count(&conn).unwrap(), 1);
}

#[test]
fn constructing_from_a_raw_document() {
    let schema = person();
    let bo = Instance::from_wire(&schema, doc! { "id": 7, "name": "Bo" }).unwrap();
    assert_eq!(bo.get("pk").unwrap(), &bson!(7));
    assert_eq!(bo.get("name").unwrap(), &bson!("Bo"));
}

#[test]
fn query_set_composition_leaves_earlier_references_reusable() {
    let schema = person();
    let conn = MemoryConnection::new();
    for (name, age) in [("Ann", 30), ("Bo", 12), ("Cy", 41)] {
        let mut p = Instance::with_values(&schema, [("name", name)]).unwrap();
        p.set("age", age).unwrap();
        p.save(&conn).unwrap();
    }

    let adults = schema.objects().filter(Filter::gte("age", 18));
    assert_eq!(adults.count(&conn).unwrap(), 2);

    let older = adults.filter(Filter::gt("age", 35));
    assert_eq!(older.count(&conn).unwrap(), 1);

    // Composing `older` did not mutate `adults`.
    assert_eq!(adults.count(&conn).unwrap(), 2);
}

#[test]
fn single_result_terminals_report_zero_and_many() {
    let schema = person();
    let conn = MemoryConnection::new();
    for name in ["Ann", "Bo"] {
        Instance::with_values(&schema, [("name", name)])
            .unwrap()
            .save(&conn)
            .unwrap();
    }

    let missing = schema
        .objects()
        .filter(Filter::eq("name", "Zoe"))
        .get(&conn);
    assert!(matches!(missing, Err(ModelError::NotFound(_))));

    let ambiguous = schema.objects().get(&conn);
    assert!(matches!(ambiguous, Err(ModelError::MultipleResults(_))));

    assert!(schema
        .objects()
        .filter(Filter::eq("name", "Zoe"))
        .first(&conn)
        .unwrap()
        .is_none());
}

#[test]
fn class_level_ordering_applies_to_results() {
    let schema = Schema::builder("Person")
        .field("name", Field::text(""))
        .field("age", Field::integer(0))
        .order_by("age", SortDirection::Asc)
        .build();
    let conn = MemoryConnection::new();
    for (name, age) in [("Cy", 41), ("Ann", 30), ("Bo", 12)] {
        let mut p = Instance::with_values(&schema, [("name", name)]).unwrap();
        p.set("age", age).unwrap();
        p.save(&conn).unwrap();
    }

    let names: Vec<String> = schema
        .objects()
        .all(&conn)
        .unwrap()
        .iter()
        .map(|p| p.get("name").unwrap().as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Bo", "Ann", "Cy"]);

    // An explicit ordering still wins over the class-level one.
    let reversed: Vec<String> = schema
        .objects()
        .order_by("age", SortDirection::Desc)
        .all(&conn)
        .unwrap()
        .iter()
        .map(|p| p.get("name").unwrap().as_str().unwrap().to_string())
        .collect();
    assert_eq!(reversed, vec!["Cy", "Ann", "Bo"]);
}

#[test]
fn re_saving_a_persisted_instance_is_insert_only() {
    let schema = person();
    let conn = MemoryConnection::new();
    let mut ann = Instance::with_values(&schema, [("name", "Ann")]).unwrap();
    ann.save(&conn).unwrap();

    // The second insert carries the adopted key; the store rejects the
    // duplicate rather than upserting.
    let err = ann.save(&conn).unwrap_err();
    assert!(matches!(err, ModelError::Backend(_)));
}

#[test]
fn custom_primary_key_name_end_to_end() {
    let schema = Schema::builder("Person")
        .field("name", Field::text(""))
        .primary_key_field("person_id")
        .build();
    let conn = MemoryConnection::with_primary_key_field("person_id");

    let mut ann = Instance::with_values(&schema, [("name", "Ann")]).unwrap();
    ann.save(&conn).unwrap();
    assert_ne!(ann.primary_key(), &Bson::Null);

    let found = schema.objects().get(&conn).unwrap();
    assert_eq!(found.primary_key(), ann.primary_key());
    assert!(found.to_wire().get("person_id").is_some());
}

#[test]
fn manager_is_a_reusable_entry_point() {
    let schema = person();
    let conn = MemoryConnection::new();
    let people = QuerySetManager::new(schema.clone());

    Instance::with_values(&schema, [("name", "Ann")])
        .unwrap()
        .save(&conn)
        .unwrap();

    assert_eq!(people.all(&conn).unwrap().len(), 1);
    assert_eq!(
        people
            .filter(Filter::eq("name", "Ann"))
            .count(&conn)
            .unwrap(),
        1
    );
    // Every access starts from empty filter state.
    assert_eq!(people.query_set().count(&conn).unwrap(), 1);
}

#[test]
fn wire_documents_convert_to_json() {
    let schema = person();
    let mut ann = Instance::with_values(&schema, [("name", "Ann")]).unwrap();
    ann.set("pk", "p-1").unwrap();

    let value = wire::to_json(&ann.to_wire()).unwrap();
    assert_eq!(value["id"], serde_json::json!("p-1"));
    assert_eq!(value["name"], serde_json::json!("Ann"));

    let rebuilt = Instance::from_wire(&schema, wire::from_json(value).unwrap()).unwrap();
    assert_eq!(rebuilt.get("pk").unwrap(), &bson!("p-1"));
    assert_eq!(rebuilt.get("name").unwrap(), &bson!("Ann"));
}

#[test]
fn a_shared_arc_handle_is_itself_a_connection() {
    let conn: std::sync::Arc<dyn Connection> = std::sync::Arc::new(MemoryConnection::new());
    let schema = person();

    Instance::with_values(&schema, [("name", "Ann")])
        .unwrap()
        .save(&conn)
        .unwrap();
    assert_eq!(schema.objects().count(&conn).unwrap(), 1);
}

#[test]
fn table_lifecycle_passes_through() {
    let schema = person();
    let conn = MemoryConnection::new();
    schema.create_table(&conn).unwrap();
    schema.drop_table(&conn).unwrap();
    assert!(schema.drop_table(&conn).is_err());
}
