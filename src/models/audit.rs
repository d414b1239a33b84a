//! Audit metadata carried by every persisted entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation/modification timestamps and the actors responsible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInfo {
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl AuditInfo {
    /// Stamp a freshly created entity.
    pub fn new(actor: impl Into<String>) -> Self {
        let actor = actor.into();
        let now = Utc::now();
        Self {
            created_at: now,
            created_by: actor.clone(),
            updated_at: now,
            updated_by: actor,
        }
    }

    /// Record a modification by `actor`, keeping the creation stamp.
    pub fn touch(&mut self, actor: impl Into<String>) {
        self.updated_at = Utc::now();
        self.updated_by = actor.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_preserves_creation() {
        let mut audit = AuditInfo::new("alice");
        let created_at = audit.created_at;

        audit.touch("bob");
        assert_eq!(audit.created_by, "alice");
        assert_eq!(audit.created_at, created_at);
        assert_eq!(audit.updated_by, "bob");
        assert!(audit.updated_at >= created_at);
    }
}
