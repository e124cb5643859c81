// 🩺 Diagnostics - database connectivity report for GET /test
//
// Never fails: every problem is folded into a status string.

use crate::config::Config;
use crate::db::DocumentStore;
use serde::{Deserialize, Serialize};

/// Error messages are cut to this many characters
pub const MAX_ERROR_CHARS: usize = 50;

/// Collections listed in the report
pub const MAX_COLLECTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

/// Inspect the configured store without propagating any error
pub fn inspect(store: Option<&dyn DocumentStore>, config: &Config) -> DiagnosticsReport {
    let mut report = DiagnosticsReport {
        backend: "✅ Running".to_string(),
        database: "❌ Not Available".to_string(),
        database_url: set_or_not(config.database_url.is_some()),
        database_name: set_or_not(config.database_name.is_some()),
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
    };

    let Some(store) = store else {
        if config.database().is_some() {
            report.database = "⚠️  Configured but failed to open".to_string();
        }
        return report;
    };

    report.database = "✅ Available".to_string();
    report.database_name = store.database_name().to_string();
    report.connection_status = "Connected".to_string();

    match store.list_collection_names() {
        Ok(mut names) => {
            names.truncate(MAX_COLLECTIONS);
            report.collections = names;
            report.database = "✅ Connected & Working".to_string();
        }
        Err(e) => {
            tracing::warn!(error = %e, "diagnostics: listing collections failed");
            report.database = format!("⚠️  Connected but Error: {}", truncate(&e.to_string()));
        }
    }

    report
}

fn set_or_not(set: bool) -> String {
    let status = if set { "✅ Set" } else { "❌ Not Set" };
    status.to_string()
}

/// Cut on a char boundary
pub fn truncate(message: &str) -> String {
    message.chars().take(MAX_ERROR_CHARS).collect()
}
