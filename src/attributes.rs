// 🏛️ Semantic Layer - Attribute Registry
// Field definitions shared by the validator and the published /schema

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

// ============================================================================
// RECORD TYPES
// ============================================================================

/// Every record shape the service knows how to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Player,
    Holding,
    Debt,
    MarketEvent,
}

impl RecordType {
    /// Lowercase name, also used as the collection name for persisted records
    pub fn name(&self) -> &'static str {
        match self {
            RecordType::Player => "player",
            RecordType::Holding => "holding",
            RecordType::Debt => "debt",
            RecordType::MarketEvent => "market_event",
        }
    }

    /// Title used in schema descriptions and error context
    pub fn title(&self) -> &'static str {
        match self {
            RecordType::Player => "Player",
            RecordType::Holding => "Holding",
            RecordType::Debt => "Debt",
            RecordType::MarketEvent => "MarketEvent",
        }
    }

    pub fn collection(&self) -> &'static str {
        self.name()
    }
}

// ============================================================================
// ATTRIBUTE TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeType {
    String,
    Number,
    /// Ordered sequence of nested records
    List(RecordType),
}

impl AttributeType {
    /// JSON Schema type keyword
    pub fn json_type(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Number => "number",
            AttributeType::List(_) => "array",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationRule {
    /// Must be present and non-null
    Required,
    /// Inclusive lower bound
    Minimum(f64),
}

// ============================================================================
// ATTRIBUTE DEFINITION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Field name as it appears on the wire (e.g., "income")
    pub name: String,

    pub type_: AttributeType,

    pub description: String,

    pub validation_rules: Vec<ValidationRule>,

    /// Value filled in when the field is absent
    pub default_value: Option<Value>,
}

impl AttributeDefinition {
    pub fn new(name: impl Into<String>, type_: AttributeType) -> Self {
        AttributeDefinition {
            name: name.into(),
            type_,
            description: String::new(),
            validation_rules: Vec::new(),
            default_value: None,
        }
    }

    /// Builder: add description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: add validation rule
    pub fn with_validation(mut self, rule: ValidationRule) -> Self {
        self.validation_rules.push(rule);
        self
    }

    /// Builder: add default value
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn is_required(&self) -> bool {
        self.validation_rules
            .iter()
            .any(|rule| matches!(rule, ValidationRule::Required))
    }

    pub fn minimum(&self) -> Option<f64> {
        self.validation_rules.iter().find_map(|rule| match rule {
            ValidationRule::Minimum(min) => Some(*min),
            _ => None,
        })
    }
}

// ============================================================================
// RECORD SCHEMA
// ============================================================================

/// Ordered attribute list for one record type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSchema {
    pub record_type: RecordType,
    pub description: String,
    pub attributes: Vec<AttributeDefinition>,
}

impl RecordSchema {
    pub fn new(record_type: RecordType, description: impl Into<String>) -> Self {
        RecordSchema {
            record_type,
            description: description.into(),
            attributes: Vec::new(),
        }
    }

    /// Builder: append attribute (declaration order is preserved)
    pub fn with_attribute(mut self, attr: AttributeDefinition) -> Self {
        self.attributes.push(attr);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    pub fn required_names(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|attr| attr.is_required())
            .map(|attr| attr.name.as_str())
            .collect()
    }
}

// ============================================================================
// ATTRIBUTE REGISTRY
// ============================================================================

/// Catalog of record schemas.
///
/// The registry is the single source of truth for:
/// - Which fields each record accepts
/// - Which of them are required, and their defaults
/// - Numeric bounds enforced at the boundary
pub struct AttributeRegistry {
    schemas: HashMap<RecordType, RecordSchema>,
}

impl AttributeRegistry {
    /// Create a new registry with all game record schemas
    pub fn new() -> Self {
        let mut registry = AttributeRegistry {
            schemas: HashMap::new(),
        };

        registry.register_core_schemas();
        registry
    }

    fn register_core_schemas(&mut self) {
        // ====================================================================
        // HOLDING
        // ====================================================================

        self.register(
            RecordSchema::new(RecordType::Holding, "An owned asset and its contribution")
                .with_attribute(required_string("name", "Asset name"))
                .with_attribute(required_string(
                    "type",
                    "Asset type, e.g., stock, real_estate, business, cash",
                ))
                .with_attribute(
                    non_negative_number("value", "Current market value"),
                )
                .with_attribute(
                    AttributeDefinition::new("income", AttributeType::Number)
                        .with_description("Recurring monthly income from this asset")
                        .with_default(json!(0)),
                ),
        );

        // ====================================================================
        // DEBT
        // ====================================================================

        self.register(
            RecordSchema::new(RecordType::Debt, "An owed liability and its obligations")
                .with_attribute(required_string("name", "Liability name"))
                .with_attribute(required_string(
                    "type",
                    "Liability type, e.g., mortgage, loan, credit",
                ))
                .with_attribute(non_negative_number("balance", "Outstanding balance"))
                .with_attribute(non_negative_number("payment", "Recurring monthly payment")),
        );

        // ====================================================================
        // PLAYER
        // ====================================================================

        self.register(
            RecordSchema::new(RecordType::Player, "Players collection schema")
                .with_attribute(required_string("name", "Player display name"))
                .with_attribute(required_string("profession", "Chosen profession archetype"))
                .with_attribute(non_negative_number("income", "Total monthly earned income"))
                .with_attribute(non_negative_number(
                    "expenses",
                    "Total monthly expenses (excluding liability payments)",
                ))
                .with_attribute(
                    AttributeDefinition::new("cash", AttributeType::Number)
                        .with_description("Liquid cash on hand, negative when in debt")
                        .with_default(json!(0)),
                )
                .with_attribute(
                    AttributeDefinition::new("assets", AttributeType::List(RecordType::Holding))
                        .with_description("List of assets")
                        .with_default(json!([])),
                )
                .with_attribute(
                    AttributeDefinition::new("liabilities", AttributeType::List(RecordType::Debt))
                        .with_description("List of liabilities")
                        .with_default(json!([])),
                ),
        );

        // ====================================================================
        // MARKET EVENT
        // ====================================================================

        self.register(
            RecordSchema::new(RecordType::MarketEvent, "A transient market movement")
                .with_attribute(required_string("asset_type", "Asset class affected"))
                .with_attribute(
                    AttributeDefinition::new("percent_change", AttributeType::Number)
                        .with_description("Signed percentage move")
                        .with_validation(ValidationRule::Required),
                )
                .with_attribute(required_string("message", "Headline shown to the player")),
        );
    }

    /// Register (or replace) a record schema
    pub fn register(&mut self, schema: RecordSchema) {
        self.schemas.insert(schema.record_type, schema);
    }

    pub fn get(&self, record_type: RecordType) -> Option<&RecordSchema> {
        self.schemas.get(&record_type)
    }

    pub fn count(&self) -> usize {
        self.schemas.len()
    }
}

impl Default for AttributeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn required_string(name: &str, description: &str) -> AttributeDefinition {
    AttributeDefinition::new(name, AttributeType::String)
        .with_description(description)
        .with_validation(ValidationRule::Required)
}

fn non_negative_number(name: &str, description: &str) -> AttributeDefinition {
    AttributeDefinition::new(name, AttributeType::Number)
        .with_description(description)
        .with_validation(ValidationRule::Minimum(0.0))
        .with_default(json!(0))
}

// ============================================================================
// TESTS
// ============================================================================
