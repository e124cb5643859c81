// 📈 Market Layer - Random market events + fixed snapshot
// Drives UI feedback only; there is no market model behind these numbers.

use crate::attributes::RecordType;
use crate::schema::Record;
use rand::Rng;
use serde::{Deserialize, Serialize};

// ============================================================================
// MARKET EVENTS
// ============================================================================

/// A transient market movement (never persisted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    pub asset_type: String,
    pub percent_change: f64,
    pub message: String,
}

impl Record for MarketEvent {
    const RECORD_TYPE: RecordType = RecordType::MarketEvent;
}

/// (asset_type, percent_change, message), selected uniformly
pub const MARKET_EVENTS: [(&str, f64, &str); 4] = [
    ("stock", 2.4, "Tech rally lifts equities"),
    ("real_estate", -1.2, "Mortgage rate uptick cools housing"),
    ("business", 1.0, "Local small biz tax credit announced"),
    ("cash", 0.1, "Savings interest accrues"),
];

/// Draw one event using the thread-local RNG
pub fn next_event() -> MarketEvent {
    next_event_with(&mut rand::thread_rng())
}

/// Draw one event from `rng`
pub fn next_event_with<R: Rng + ?Sized>(rng: &mut R) -> MarketEvent {
    let (asset_type, percent_change, message) = MARKET_EVENTS[rng.gen_range(0..MARKET_EVENTS.len())];

    MarketEvent {
        asset_type: asset_type.to_string(),
        percent_change,
        message: message.to_string(),
    }
}

// ============================================================================
// SNAPSHOT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockIndex {
    pub index: f64,
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyMarket {
    pub avg_price: u64,
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessClimate {
    pub sentiment: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditMarket {
    pub rate: f64,
}

/// Static market overview shown on the game dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub stocks: StockIndex,
    pub property: PropertyMarket,
    pub business: BusinessClimate,
    pub credit: CreditMarket,
}

/// Same values on every call
pub fn snapshot() -> MarketSnapshot {
    MarketSnapshot {
        stocks: StockIndex {
            index: 4120.5,
            change: 0.8,
        },
        property: PropertyMarket {
            avg_price: 356_000,
            change: -0.4,
        },
        business: BusinessClimate { sentiment: 62 },
        credit: CreditMarket { rate: 6.9 },
    }
}
