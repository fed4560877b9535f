use pets_core::model::pet::{COLUMN_BREED, COLUMN_GENDER, COLUMN_ID, COLUMN_NAME, COLUMN_WEIGHT};
use pets_core::{
    validate_for_insert, validate_for_update, Gender, PetValues, ValidationError,
    ValidationReason,
};
use rusqlite::types::Value;

fn toto() -> PetValues {
    PetValues::new()
        .with_text(COLUMN_NAME, "Toto")
        .with_text(COLUMN_BREED, "Terrier")
        .with_int(COLUMN_GENDER, Gender::MALE)
        .with_int(COLUMN_WEIGHT, 7)
}

fn reason(err: ValidationError) -> (String, ValidationReason) {
    (err.field, err.reason)
}

#[test]
fn insert_accepts_complete_payload() {
    let payload = validate_for_insert(&toto()).unwrap();
    assert_eq!(payload.len(), 4);
    assert_eq!(payload.get(COLUMN_NAME), Some(&Value::Text("Toto".into())));
    assert_eq!(payload.get(COLUMN_WEIGHT), Some(&Value::Integer(7)));
}

#[test]
fn insert_requires_name() {
    let mut values = toto();
    values.remove(COLUMN_NAME);
    assert_eq!(
        reason(validate_for_insert(&values).unwrap_err()),
        (COLUMN_NAME.to_string(), ValidationReason::MissingRequired)
    );

    for blank in [Value::Null, Value::Text(String::new()), Value::Text("   ".into())] {
        let mut values = toto();
        values.put(COLUMN_NAME, blank);
        assert_eq!(
            validate_for_insert(&values).unwrap_err().reason,
            ValidationReason::MissingRequired
        );
    }
}

#[test]
fn insert_requires_known_gender() {
    let mut values = toto();
    values.remove(COLUMN_GENDER);
    assert_eq!(
        reason(validate_for_insert(&values).unwrap_err()),
        (COLUMN_GENDER.to_string(), ValidationReason::MissingRequired)
    );

    let values = toto().with_int(COLUMN_GENDER, 3);
    assert_eq!(
        reason(validate_for_insert(&values).unwrap_err()),
        (COLUMN_GENDER.to_string(), ValidationReason::InvalidEnum)
    );

    let values = toto().with_text(COLUMN_GENDER, "male");
    assert_eq!(
        validate_for_insert(&values).unwrap_err().reason,
        ValidationReason::InvalidType
    );
}

#[test]
fn insert_rejects_negative_weight() {
    let values = toto().with_int(COLUMN_WEIGHT, -1);
    assert_eq!(
        reason(validate_for_insert(&values).unwrap_err()),
        (COLUMN_WEIGHT.to_string(), ValidationReason::OutOfRange)
    );
}

#[test]
fn insert_leaves_weight_and_breed_optional() {
    let values = PetValues::new()
        .with_text(COLUMN_NAME, "Mia")
        .with_int(COLUMN_GENDER, Gender::FEMALE);
    let payload = validate_for_insert(&values).unwrap();
    assert_eq!(payload.get(COLUMN_WEIGHT), None);
    assert_eq!(payload.get(COLUMN_BREED), None);

    let values = values.with_null(COLUMN_WEIGHT).with_null(COLUMN_BREED);
    let payload = validate_for_insert(&values).unwrap();
    assert_eq!(payload.get(COLUMN_WEIGHT), None);
    assert_eq!(payload.get(COLUMN_BREED), Some(&Value::Text(String::new())));
}

#[test]
fn id_and_unknown_columns_are_rejected() {
    let values = toto().with_int(COLUMN_ID, 5);
    assert_eq!(
        reason(validate_for_insert(&values).unwrap_err()),
        (COLUMN_ID.to_string(), ValidationReason::ImmutableField)
    );

    let values = PetValues::new().with_text("owner", "Dorothy");
    assert_eq!(
        reason(validate_for_update(&values).unwrap_err()),
        ("owner".to_string(), ValidationReason::UnknownField)
    );
}

#[test]
fn update_checks_only_present_fields() {
    assert!(validate_for_update(&PetValues::new()).unwrap().is_empty());

    let values = PetValues::new().with_int(COLUMN_WEIGHT, 12);
    let payload = validate_for_update(&values).unwrap();
    assert_eq!(payload.columns().collect::<Vec<_>>(), [COLUMN_WEIGHT]);

    let values = PetValues::new().with_int(COLUMN_WEIGHT, -3);
    assert_eq!(
        validate_for_update(&values).unwrap_err().reason,
        ValidationReason::OutOfRange
    );

    let values = PetValues::new().with_null(COLUMN_NAME);
    assert_eq!(
        validate_for_update(&values).unwrap_err().reason,
        ValidationReason::MissingRequired
    );

    let values = PetValues::new().with_int(COLUMN_GENDER, 9);
    assert_eq!(
        validate_for_update(&values).unwrap_err().reason,
        ValidationReason::InvalidEnum
    );
}

#[test]
fn error_message_names_field_and_reason() {
    let err = validate_for_insert(&toto().with_int(COLUMN_WEIGHT, -1)).unwrap_err();
    assert_eq!(err.to_string(), "invalid `weight`: value out of range");
}
