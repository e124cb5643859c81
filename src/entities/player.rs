// 🎲 Player Entity - Validated player records and their stored form
//
// Player is what a client submits; PlayerRecord is what the store hands back
// (the same fields plus the store-assigned identity and timestamps).

use crate::attributes::RecordType;
use crate::db::{Document, StorageError};
use crate::schema::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// HOLDING / DEBT
// ============================================================================

/// An owned asset and its value/income contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub name: String,

    /// Free-form category (stock, real_estate, business, cash, ...)
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub value: f64,

    /// Monthly income, may be negative
    #[serde(default)]
    pub income: f64,
}

impl Holding {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, value: f64, income: f64) -> Self {
        Holding {
            name: name.into(),
            kind: kind.into(),
            value,
            income,
        }
    }
}

impl Record for Holding {
    const RECORD_TYPE: RecordType = RecordType::Holding;
}

/// An owed liability and its balance/payment obligation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub balance: f64,

    #[serde(default)]
    pub payment: f64,
}

impl Debt {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, balance: f64, payment: f64) -> Self {
        Debt {
            name: name.into(),
            kind: kind.into(),
            balance,
            payment,
        }
    }
}

impl Record for Debt {
    const RECORD_TYPE: RecordType = RecordType::Debt;
}

// ============================================================================
// PLAYER
// ============================================================================

/// Player as submitted by a client (collection: "player")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub profession: String,

    #[serde(default)]
    pub income: f64,

    #[serde(default)]
    pub expenses: f64,

    /// Liquid cash; negative represents debt
    #[serde(default)]
    pub cash: f64,

    #[serde(default)]
    pub assets: Vec<Holding>,

    #[serde(default)]
    pub liabilities: Vec<Debt>,
}

impl Player {
    pub fn new(name: impl Into<String>, profession: impl Into<String>) -> Self {
        Player {
            name: name.into(),
            profession: profession.into(),
            income: 0.0,
            expenses: 0.0,
            cash: 0.0,
            assets: Vec::new(),
            liabilities: Vec::new(),
        }
    }

    /// Builder: set monthly income, expenses and cash on hand
    pub fn with_finances(mut self, income: f64, expenses: f64, cash: f64) -> Self {
        self.income = income;
        self.expenses = expenses;
        self.cash = cash;
        self
    }

    /// Builder: append an asset
    pub fn with_asset(mut self, holding: Holding) -> Self {
        self.assets.push(holding);
        self
    }

    /// Builder: append a liability
    pub fn with_liability(mut self, debt: Debt) -> Self {
        self.liabilities.push(debt);
        self
    }
}

impl Record for Player {
    const RECORD_TYPE: RecordType = RecordType::Player;
}

// ============================================================================
// STORED PLAYER
// ============================================================================

/// A Player as read back from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Store-assigned identifier (never reused)
    pub id: String,

    #[serde(flatten)]
    pub player: Player,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<Document> for PlayerRecord {
    type Error = StorageError;

    /// Expects a document whose internal identifier was already exposed as "id"
    fn try_from(document: Document) -> Result<Self, Self::Error> {
        serde_json::from_value(Value::Object(document))
            .map_err(|e| StorageError::Serialization(format!("malformed player document: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_player_builder() {
        let player = Player::new("Alice", "Engineer")
            .with_finances(5000.0, 2000.0, 1000.0)
            .with_asset(Holding::new("Rental", "real_estate", 150000.0, 900.0))
            .with_liability(Debt::new("Mortgage", "mortgage", 120000.0, 700.0));

        assert_eq!(player.income, 5000.0);
        assert_eq!(player.assets[0].kind, "real_estate");
        assert_eq!(player.liabilities[0].balance, 120000.0);
    }

    #[test]
    fn test_holding_serializes_type_field() {
        let value = serde_json::to_value(Holding::new("Shop", "business", 0.0, -50.0)).unwrap();

        assert_eq!(value, json!({"name": "Shop", "type": "business", "value": 0.0, "income": -50.0}));
    }

    #[test]
    fn test_player_record_from_document() {
        let document = json!({
            "id": "6f1c7c5e-2f4d-4a8e-9c1b-0d1e2f3a4b5c",
            "name": "Alice",
            "profession": "Engineer",
            "income": 5000,
            "expenses": 2000.0,
            "cash": 1000,
            "assets": [],
            "liabilities": [],
            "created_at": "2026-01-02T03:04:05Z",
            "updated_at": "2026-01-02T03:04:05Z"
        });
        let Value::Object(document) = document else { unreachable!() };

        let record = PlayerRecord::try_from(document).unwrap();
        assert_eq!(record.id, "6f1c7c5e-2f4d-4a8e-9c1b-0d1e2f3a4b5c");
        assert_eq!(record.player.name, "Alice");
        assert_eq!(record.player.income, 5000.0);
        assert!(record.created_at.is_some());
    }

    #[test]
    fn test_player_record_requires_id() {
        let Value::Object(document) = json!({"name": "NoId", "profession": "Ghost"}) else {
            unreachable!()
        };

        let err = PlayerRecord::try_from(document).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn test_player_record_serializes_flat() {
        let record = PlayerRecord {
            id: "abc".to_string(),
            player: Player::new("Bo", "Chef"),
            created_at: None,
            updated_at: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["name"], "Bo");
        assert!(value.get("player").is_none());
        assert!(value.get("created_at").is_none());
    }
}
