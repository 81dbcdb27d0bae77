use dm_core::app_error::AppError;
use jsonschema::validator_for;
use serde_json::json;

fn app_error_schema() -> serde_json::Value {
    json!({
      "$schema": "https://json-schema.org/draft/2020-12/schema",
      "$id": "dm://schemas/app-error/v1",
      "type": "object",
      "required": [
        "schema_version",
        "code",
        "category",
        "message",
        "retryable",
        "details"
      ],
      "properties": {
        "schema_version": { "const": 1 },
        "code": { "type": "string", "pattern": "^DM_[A-Z_]+$" },
        "category": { "type": "string" },
        "message": { "type": "string" },
        "retryable": { "type": "boolean" },
        "details": {}
      },
      "additionalProperties": false
    })
}

#[test]
fn schema_app_error_accepts_taxonomy_errors() {
    let schema = validator_for(&app_error_schema()).expect("compile app_error schema");
    for err in [
        AppError::unsupported_format("xls"),
        AppError::extraction("failed to parse pdf", json!({ "error": "eof" })),
        AppError::persistence("failed to insert record", json!({})),
        AppError::new("DM_RECORD_CORRUPT", "store", "stored metadata is not valid json", false, json!({})),
    ] {
        let value = serde_json::to_value(&err).expect("serialize app_error");
        assert!(schema.is_valid(&value), "{}", err.code);
    }
}

#[test]
fn schema_app_error_rejects_missing_code() {
    let schema = validator_for(&app_error_schema()).expect("compile app_error schema");
    let invalid = json!({
      "schema_version": 1,
      "category": "store",
      "message": "missing code",
      "retryable": false,
      "details": {}
    });

    assert!(!schema.is_valid(&invalid));
}

#[test]
fn taxonomy_retryability() {
    assert!(!AppError::unsupported_format("txt").retryable);
    assert!(!AppError::extraction("x", json!({})).retryable);
    assert!(AppError::persistence("x", json!({})).retryable);
    assert_eq!(
        AppError::unsupported_format("txt").details["extension"],
        json!("txt")
    );
}
