// Financial Literacy Game - Core Library
// Exposes all modules for use in the API server and tests

pub mod attributes;     // Semantic Layer - field definitions per record
pub mod schema;         // Shape Layer - validation + schema description
pub mod entities;       // Typed player records
pub mod db;             // Document Access Layer
pub mod market;         // Market events + snapshot
pub mod diagnostics;    // /test connectivity report
pub mod config;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use attributes::{
    AttributeDefinition, AttributeRegistry, AttributeType, RecordSchema, RecordType, ValidationRule,
};
pub use schema::{Record, SchemaValidator, ValidationError, ValidationErrors, ValidationResult};
pub use entities::{Debt, Holding, Player, PlayerRecord};
pub use db::{
    create_document, get_document, get_documents,
    Document, DocumentStore, Filter, InMemoryDocumentStore, SqliteDocumentStore,
    StorageError, StorageResult,
};
pub use market::{next_event, snapshot, MarketEvent, MarketSnapshot, MARKET_EVENTS};
pub use diagnostics::DiagnosticsReport;
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
