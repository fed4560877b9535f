use pets_core::model::pet::{
    is_known_column, ALL_COLUMNS, COLUMN_BREED, COLUMN_GENDER, COLUMN_NAME, COLUMN_WEIGHT,
    TABLE_NAME,
};
use pets_core::{is_valid_gender, item_uri, Gender, Pet};
use rusqlite::types::Value;

fn toto() -> Pet {
    Pet {
        id: 4,
        name: "Toto".to_string(),
        breed: "Terrier".to_string(),
        gender: Gender::Male,
        weight: 7,
    }
}

#[test]
fn contract_names_table_and_columns() {
    assert_eq!(TABLE_NAME, "pets");
    assert_eq!(ALL_COLUMNS, ["_id", "name", "breed", "gender", "weight"]);
    assert!(is_known_column("breed"));
    assert!(!is_known_column("owner"));
}

#[test]
fn gender_domain_is_closed() {
    for code in 0..=2 {
        assert!(is_valid_gender(code));
        assert_eq!(Gender::from_i64(code).unwrap().as_i64(), code);
    }
    for code in [-1, 3, i64::MAX] {
        assert!(!is_valid_gender(code));
    }
    assert_eq!(Gender::parse_label(" Female "), Some(Gender::Female));
    assert_eq!(Gender::parse_label("cat"), None);
    assert_eq!(Gender::default(), Gender::Unknown);
}

#[test]
fn pet_serialization_uses_integer_gender() {
    let json = serde_json::to_value(toto()).unwrap();
    assert_eq!(json["id"], 4);
    assert_eq!(json["name"], "Toto");
    assert_eq!(json["breed"], "Terrier");
    assert_eq!(json["gender"], 1);
    assert_eq!(json["weight"], 7);

    let decoded: Pet = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, toto());
}

#[test]
fn deserialize_rejects_unknown_gender_code() {
    let value = serde_json::json!({
        "id": 1,
        "name": "Rex",
        "breed": "",
        "gender": 3,
        "weight": 0
    });

    let err = serde_json::from_value::<Pet>(value).unwrap_err();
    assert!(
        err.to_string().contains("invalid gender code 3"),
        "unexpected error: {err}"
    );
}

#[test]
fn to_values_omits_id_and_uri_points_at_row() {
    let pet = toto();
    let values = pet.to_values();

    assert_eq!(values.len(), 4);
    assert_eq!(values.get(COLUMN_NAME), Some(&Value::Text("Toto".into())));
    assert_eq!(values.get(COLUMN_BREED), Some(&Value::Text("Terrier".into())));
    assert_eq!(values.get(COLUMN_GENDER), Some(&Value::Integer(1)));
    assert_eq!(values.get(COLUMN_WEIGHT), Some(&Value::Integer(7)));
    assert_eq!(pet.uri(), item_uri(4));
}
