//! Fire-and-forget audit logging service

use uuid::Uuid;

use crate::repository::Repository;

/// Writes action log rows without ever blocking or failing the caller.
/// The insert runs on a spawned task; a sink failure is logged and
/// discarded, never propagated into the operation being audited.
#[derive(Clone)]
pub struct AuditService {
    repository: Repository,
}

impl AuditService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record a completed action
    pub fn log_action(
        &self,
        action: &'static str,
        user_id: Uuid,
        entity_type: &'static str,
        entity_id: Option<Uuid>,
        payload: serde_json::Value,
    ) {
        let repository = self.repository.clone();

        tokio::spawn(async move {
            if let Err(e) = repository
                .audit
                .insert(action, user_id, entity_type, entity_id, payload)
                .await
            {
                tracing::error!(
                    "Failed to log action '{}' for user {}: {}",
                    action,
                    user_id,
                    e
                );
            }
        });
    }
}
