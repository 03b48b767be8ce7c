use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::db::Tables;

#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub username: String,
    pub action: String,
    pub resource: String,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
}

/// Records a mutation inside the caller's write lock.
pub fn log_audit(
    tables: &mut Tables,
    username: &str,
    action: &str,
    resource: &str,
    metadata: Value,
) {
    tracing::info!(user = %username, action, resource, "audit");
    tables.audit_log.push(AuditEntry {
        username: username.to_string(),
        action: action.to_string(),
        resource: resource.to_string(),
        metadata,
        created_at: Utc::now(),
    });
}
