// 📐 Shape Layer - Schema Validation
// Checks raw JSON against the attribute registry before it reaches storage

use crate::attributes::{AttributeDefinition, AttributeRegistry, AttributeType, RecordType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

// ============================================================================
// RECORD TRAIT
// ============================================================================

/// A typed record that has a schema in the registry.
pub trait Record: Serialize + DeserializeOwned {
    const RECORD_TYPE: RecordType;
}

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted path to the offending value (e.g., "assets.1.value")
    pub field: String,
    pub message: String,
    pub context: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.context, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Every constraint violated by one input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} validation error(s) for {}: {}", .errors.len(), .record_type.title(), summary(.errors))]
pub struct ValidationErrors {
    pub record_type: RecordType,
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn single(
        record_type: RecordType,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationErrors {
            record_type,
            errors: vec![ValidationError {
                field: field.into(),
                message: message.into(),
                context: record_type.title().to_string(),
            }],
        }
    }

    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }
}

fn summary(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type ValidationResult<T> = Result<T, ValidationErrors>;

// ============================================================================
// SCHEMA VALIDATOR
// ============================================================================

pub struct SchemaValidator {
    registry: AttributeRegistry,
}

impl SchemaValidator {
    pub fn new() -> Self {
        SchemaValidator {
            registry: AttributeRegistry::new(),
        }
    }

    /// Validate raw input and build the typed record
    pub fn validate<T: Record>(&self, raw: &Value) -> ValidationResult<T> {
        let normalized = self.check(raw, T::RECORD_TYPE)?;

        serde_json::from_value(Value::Object(normalized))
            .map_err(|e| ValidationErrors::single(T::RECORD_TYPE, "body", e.to_string()))
    }

    /// Validate raw input against a record schema.
    ///
    /// Returns the normalized object: unknown fields dropped, defaults filled
    /// in. On failure every violation is reported, not just the first.
    pub fn check(&self, raw: &Value, record_type: RecordType) -> ValidationResult<Map<String, Value>> {
        let mut errors = Vec::new();
        let normalized = self.check_object(raw, record_type, "", &mut errors);

        match normalized {
            Some(object) if errors.is_empty() => Ok(object),
            _ => Err(ValidationErrors {
                record_type,
                errors,
            }),
        }
    }

    fn check_object(
        &self,
        raw: &Value,
        record_type: RecordType,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) -> Option<Map<String, Value>> {
        let context = record_type.title();

        let Some(schema) = self.registry.get(record_type) else {
            errors.push(error_at(field_path(path, "body"), "no schema registered", context));
            return None;
        };

        let Value::Object(object) = raw else {
            let at = if path.is_empty() { "body" } else { path };
            errors.push(error_at(
                at.to_string(),
                format!("expected an object, got {}", kind_of(raw)),
                context,
            ));
            return None;
        };

        let mut normalized = Map::new();

        for attr in &schema.attributes {
            let at = field_path(path, &attr.name);

            match object.get(&attr.name) {
                None | Some(Value::Null) if attr.is_required() => {
                    errors.push(error_at(at, "field required", context));
                }
                None => {
                    if let Some(default) = &attr.default_value {
                        normalized.insert(attr.name.clone(), default.clone());
                    }
                }
                Some(value) => {
                    if let Some(checked) = self.check_value(attr, value, &at, context, errors) {
                        normalized.insert(attr.name.clone(), checked);
                    }
                }
            }
        }

        Some(normalized)
    }

    fn check_value(
        &self,
        attr: &AttributeDefinition,
        value: &Value,
        at: &str,
        context: &str,
        errors: &mut Vec<ValidationError>,
    ) -> Option<Value> {
        match (&attr.type_, value) {
            (AttributeType::String, Value::String(_)) => Some(value.clone()),
            (AttributeType::Number, Value::Number(number)) => {
                let n = number.as_f64()?;
                if let Some(min) = attr.minimum() {
                    if n < min {
                        errors.push(error_at(
                            at.to_string(),
                            format!("must be greater than or equal to {}, got {}", min, n),
                            context,
                        ));
                        return None;
                    }
                }
                Some(value.clone())
            }
            (AttributeType::List(item_type), Value::Array(items)) => {
                let before = errors.len();
                let checked: Vec<Value> = items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, item)| {
                        self.check_object(item, *item_type, &format!("{}.{}", at, i), errors)
                            .map(Value::Object)
                    })
                    .collect();

                (errors.len() == before).then_some(Value::Array(checked))
            }
            (expected, other) => {
                errors.push(error_at(
                    at.to_string(),
                    format!("expected {}, got {}", expected.json_type(), kind_of(other)),
                    context,
                ));
                None
            }
        }
    }

    // ========================================================================
    // INTROSPECTION
    // ========================================================================

    /// Describe a record schema as a JSON-Schema-style document.
    ///
    /// Nested record types are emitted once under `$defs` and referenced
    /// from `items`.
    pub fn describe(&self, record_type: RecordType) -> Value {
        let mut defs = Map::new();
        let mut root = self.describe_record(record_type, &mut defs);

        if !defs.is_empty() {
            if let Value::Object(object) = &mut root {
                object.insert("$defs".to_string(), Value::Object(defs));
            }
        }

        root
    }

    fn describe_record(&self, record_type: RecordType, defs: &mut Map<String, Value>) -> Value {
        let Some(schema) = self.registry.get(record_type) else {
            return json!({ "title": record_type.title(), "type": "object" });
        };

        let mut properties = Map::new();

        for attr in &schema.attributes {
            let mut property = Map::new();
            property.insert("title".to_string(), json!(title_case(&attr.name)));
            property.insert("type".to_string(), json!(attr.type_.json_type()));

            if !attr.description.is_empty() {
                property.insert("description".to_string(), json!(attr.description));
            }
            if let Some(min) = attr.minimum() {
                property.insert("minimum".to_string(), json!(min));
            }
            if let Some(default) = &attr.default_value {
                property.insert("default".to_string(), default.clone());
            }
            if let AttributeType::List(item_type) = &attr.type_ {
                if !defs.contains_key(item_type.title()) {
                    let nested = self.describe_record(*item_type, defs);
                    defs.insert(item_type.title().to_string(), nested);
                }
                property.insert(
                    "items".to_string(),
                    json!({ "$ref": format!("#/$defs/{}", item_type.title()) }),
                );
            }

            properties.insert(attr.name.clone(), Value::Object(property));
        }

        json!({
            "title": record_type.title(),
            "description": schema.description,
            "type": "object",
            "properties": properties,
            "required": schema.required_names(),
        })
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn error_at(field: String, message: impl Into<String>, context: &str) -> ValidationError {
    ValidationError {
        field,
        message: message.into(),
        context: context.to_string(),
    }
}

fn field_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Player;
    use proptest::prelude::*;

    fn valid_player() -> Value {
        json!({
            "name": "Alice",
            "profession": "Engineer",
            "income": 5000,
            "expenses": 2000,
            "cash": 1000,
            "assets": [
                {"name": "Index fund", "type": "stock", "value": 12000, "income": 40}
            ],
            "liabilities": [
                {"name": "Car loan", "type": "loan", "balance": 8000, "payment": 250}
            ]
        })
    }

    #[test]
    fn test_validate_player_valid() {
        let validator = SchemaValidator::new();
        let player: Player = validator.validate(&valid_player()).unwrap();

        assert_eq!(player.name, "Alice");
        assert_eq!(player.income, 5000.0);
        assert_eq!(player.assets.len(), 1);
        assert_eq!(player.assets[0].kind, "stock");
        assert_eq!(player.liabilities[0].payment, 250.0);
    }

    #[test]
    fn test_defaults_filled_in() {
        let validator = SchemaValidator::new();
        let player: Player = validator
            .validate(&json!({"name": "Bob", "profession": "Teacher"}))
            .unwrap();

        assert_eq!(player.income, 0.0);
        assert_eq!(player.expenses, 0.0);
        assert_eq!(player.cash, 0.0);
        assert!(player.assets.is_empty());
        assert!(player.liabilities.is_empty());
    }

    #[test]
    fn test_missing_name_rejected() {
        let validator = SchemaValidator::new();
        let result = validator.validate::<Player>(&json!({"profession": "Engineer"}));

        let errors = result.unwrap_err();
        assert_eq!(errors.fields(), vec!["name"]);
        assert_eq!(errors.errors[0].message, "field required");
        assert_eq!(errors.errors[0].context, "Player");
    }

    #[test]
    fn test_null_required_field_rejected() {
        let validator = SchemaValidator::new();
        let result = validator.check(&json!({"name": null, "profession": "Chef"}), RecordType::Player);

        assert_eq!(result.unwrap_err().fields(), vec!["name"]);
    }

    #[test]
    fn test_negative_income_and_expenses_rejected() {
        let validator = SchemaValidator::new();
        let raw = json!({
            "name": "Carol",
            "profession": "Nurse",
            "income": -1,
            "expenses": -0.5
        });

        let errors = validator.validate::<Player>(&raw).unwrap_err();
        assert_eq!(errors.fields(), vec!["income", "expenses"]);
        assert!(errors.errors[0].message.contains("greater than or equal to 0"));
    }

    #[test]
    fn test_negative_cash_allowed() {
        let validator = SchemaValidator::new();
        let player: Player = validator
            .validate(&json!({"name": "Dan", "profession": "Artist", "cash": -250.75}))
            .unwrap();

        assert_eq!(player.cash, -250.75);
    }

    #[test]
    fn test_all_violations_reported() {
        let validator = SchemaValidator::new();
        let raw = json!({
            "profession": 7,
            "income": "lots",
            "cash": true,
            "assets": [
                {"name": "House", "type": "real_estate", "value": -1},
                "not an object",
                {"type": "business", "income": -300}
            ],
            "liabilities": [{"name": "Card", "type": "credit", "payment": -5}]
        });

        let errors = validator.check(&raw, RecordType::Player).unwrap_err();
        assert_eq!(
            errors.fields(),
            vec![
                "name",
                "profession",
                "income",
                "cash",
                "assets.0.value",
                "assets.1",
                "assets.2.name",
                "liabilities.0.payment",
            ]
        );
        assert_eq!(errors.errors[1].message, "expected string, got number");
        assert_eq!(errors.errors[4].context, "Holding");
        assert_eq!(errors.errors[7].context, "Debt");
    }

    #[test]
    fn test_non_object_body_rejected() {
        let validator = SchemaValidator::new();
        let errors = validator.check(&json!([1, 2, 3]), RecordType::Player).unwrap_err();

        assert_eq!(errors.fields(), vec!["body"]);
        assert_eq!(errors.errors[0].message, "expected an object, got array");
    }

    #[test]
    fn test_null_optional_field_rejected() {
        let validator = SchemaValidator::new();
        let errors = validator
            .check(&json!({"name": "Eve", "profession": "Pilot", "assets": null}), RecordType::Player)
            .unwrap_err();

        assert_eq!(errors.fields(), vec!["assets"]);
        assert_eq!(errors.errors[0].message, "expected array, got null");
    }

    #[test]
    fn test_unknown_fields_dropped() {
        let validator = SchemaValidator::new();
        let normalized = validator
            .check(
                &json!({"name": "Fay", "profession": "Chef", "_id": "forged", "level": 9}),
                RecordType::Player,
            )
            .unwrap();

        assert!(!normalized.contains_key("_id"));
        assert!(!normalized.contains_key("level"));
        assert_eq!(normalized.len(), 7);
    }

    #[test]
    fn test_holding_order_preserved() {
        let validator = SchemaValidator::new();
        let raw = json!({
            "name": "Gus",
            "profession": "Farmer",
            "assets": [
                {"name": "Barn", "type": "real_estate"},
                {"name": "Barn", "type": "business"},
                {"name": "Savings", "type": "cash"}
            ]
        });

        let player: Player = validator.validate(&raw).unwrap();
        let kinds: Vec<&str> = player.assets.iter().map(|h| h.kind.as_str()).collect();
        assert_eq!(kinds, vec!["real_estate", "business", "cash"]);
    }

    #[test]
    fn test_validation_errors_display() {
        let errors = ValidationErrors::single(RecordType::Player, "name", "field required");
        assert_eq!(
            errors.to_string(),
            "1 validation error(s) for Player: name: field required"
        );
        assert_eq!(errors.errors[0].to_string(), "[Player] name: field required");
    }

    #[test]
    fn test_describe_player_schema() {
        let validator = SchemaValidator::new();
        let schema = validator.describe(RecordType::Player);

        assert_eq!(schema["title"], "Player");
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["name", "profession"]));
        assert_eq!(schema["properties"]["income"]["minimum"], json!(0.0));
        assert_eq!(schema["properties"]["income"]["default"], json!(0));
        assert!(schema["properties"]["cash"].get("minimum").is_none());
        assert_eq!(schema["properties"]["assets"]["type"], "array");
        assert_eq!(
            schema["properties"]["assets"]["items"]["$ref"],
            "#/$defs/Holding"
        );
        assert_eq!(schema["$defs"]["Debt"]["properties"]["balance"]["minimum"], json!(0.0));
        assert_eq!(schema["$defs"]["Holding"]["required"], json!(["name", "type"]));
    }

    #[test]
    fn test_describe_flat_schema_has_no_defs() {
        let validator = SchemaValidator::new();
        let schema = validator.describe(RecordType::MarketEvent);

        assert!(schema.get("$defs").is_none());
        assert_eq!(
            schema["required"],
            json!(["asset_type", "percent_change", "message"])
        );
        assert_eq!(schema["properties"]["percent_change"]["title"], "Percent Change");
    }

    // Generated players

    fn holding_strategy() -> impl Strategy<Value = Value> {
        (
            "[A-Za-z][A-Za-z ]{0,15}",
            prop::sample::select(vec!["stock", "real_estate", "business", "cash"]),
            0.0..1.0e7f64,
            -1.0e4..1.0e4f64,
        )
            .prop_map(|(name, kind, value, income)| {
                json!({"name": name, "type": kind, "value": value, "income": income})
            })
    }

    fn debt_strategy() -> impl Strategy<Value = Value> {
        (
            "[A-Za-z][A-Za-z ]{0,15}",
            prop::sample::select(vec!["mortgage", "loan", "credit"]),
            0.0..1.0e7f64,
            0.0..1.0e5f64,
        )
            .prop_map(|(name, kind, balance, payment)| {
                json!({"name": name, "type": kind, "balance": balance, "payment": payment})
            })
    }

    fn player_strategy() -> impl Strategy<Value = Value> {
        (
            "[A-Za-z][A-Za-z ]{0,20}",
            "[A-Za-z][A-Za-z ]{0,20}",
            0.0..1.0e7f64,
            0.0..1.0e7f64,
            -1.0e6..1.0e6f64,
            prop::collection::vec(holding_strategy(), 0..4),
            prop::collection::vec(debt_strategy(), 0..4),
        )
            .prop_map(|(name, profession, income, expenses, cash, assets, liabilities)| {
                json!({
                    "name": name,
                    "profession": profession,
                    "income": income,
                    "expenses": expenses,
                    "cash": cash,
                    "assets": assets,
                    "liabilities": liabilities
                })
            })
    }

    proptest! {
        #[test]
        fn prop_valid_players_pass(raw in player_strategy()) {
            let validator = SchemaValidator::new();
            let player: Player = validator.validate(&raw).unwrap();

            prop_assert_eq!(player.name.as_str(), raw["name"].as_str().unwrap());
            prop_assert_eq!(player.profession.as_str(), raw["profession"].as_str().unwrap());
            prop_assert_eq!(player.assets.len(), raw["assets"].as_array().unwrap().len());
            prop_assert_eq!(player.liabilities.len(), raw["liabilities"].as_array().unwrap().len());
        }

        #[test]
        fn prop_negative_income_or_expenses_fail(
            mut raw in player_strategy(),
            field in prop::sample::select(vec!["income", "expenses"]),
            amount in -1.0e7..-1.0e-6f64,
        ) {
            raw[field] = json!(amount);

            let errors = SchemaValidator::new().validate::<Player>(&raw).unwrap_err();
            prop_assert_eq!(errors.fields(), vec![field]);
        }

        #[test]
        fn prop_missing_required_field_fails(
            mut raw in player_strategy(),
            field in prop::sample::select(vec!["name", "profession"]),
        ) {
            raw.as_object_mut().unwrap().remove(field);

            let errors = SchemaValidator::new().validate::<Player>(&raw).unwrap_err();
            prop_assert_eq!(errors.fields(), vec![field]);
            prop_assert_eq!(errors.errors[0].message.as_str(), "field required");
        }
    }
}
