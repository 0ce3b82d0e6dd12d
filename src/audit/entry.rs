//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    /// Full replacement of an existing series
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Kinds of series that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Bill,
    PaySeries,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Bill => write!(f, "Bill"),
            EntityType::PaySeries => write!(f, "Pay series"),
        }
    }
}

/// A single audit log entry
///
/// Snapshots are the flat stored records, so the log reads the same way as
/// the data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    /// Series name at the time of the operation
    pub entity_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    /// Entry for a newly added series
    pub fn create<T: Serialize>(entity_type: EntityType, name: impl Into<String>, record: &T) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            entity_type,
            entity_name: name.into(),
            before: None,
            after: serde_json::to_value(record).ok(),
            diff_summary: None,
        }
    }

    /// Entry for a replaced series, with a field-level summary of what changed
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        name: impl Into<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let before = serde_json::to_value(before).ok();
        let after = serde_json::to_value(after).ok();
        let diff_summary = match (&before, &after) {
            (Some(b), Some(a)) => record_diff(b, a),
            _ => None,
        };

        Self {
            timestamp: Utc::now(),
            operation: Operation::Update,
            entity_type,
            entity_name: name.into(),
            before,
            after,
            diff_summary,
        }
    }

    /// Entry for a removed series
    pub fn delete<T: Serialize>(entity_type: EntityType, name: impl Into<String>, record: &T) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Delete,
            entity_type,
            entity_name: name.into(),
            before: serde_json::to_value(record).ok(),
            after: None,
            diff_summary: None,
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_name
        );

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

/// Describe the top-level field changes between two flat records
///
/// Returns `None` when nothing changed.
pub fn record_diff(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return (before != after).then(|| format!("{} -> {}", before, after));
    };

    let mut changes: Vec<String> = before_obj
        .iter()
        .filter_map(|(key, old)| {
            let new = after_obj.get(key).unwrap_or(&Value::Null);
            (old != new).then(|| format!("{}: {} -> {}", key, old, new))
        })
        .collect();

    changes.extend(
        after_obj
            .iter()
            .filter(|(key, _)| !before_obj.contains_key(*key))
            .map(|(key, new)| format!("{}: null -> {}", key, new)),
    );

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}
