//! Company chat and the audit log.

use chrono::Utc;
use uuid::Uuid;

use super::{PayrollService, require_admin};
use crate::error::{PayrollError, PayrollResult};
use crate::models::{AuditEntry, ChatMessage, Session};

impl PayrollService {
    /// Posts a chat message to the company channel.
    pub async fn post_message(&self, session: &Session, body: &str) -> PayrollResult<ChatMessage> {
        let body = body.trim();
        let max_length = self.policy.max_chat_message_length;
        let length = body.chars().count();
        if length == 0 || length > max_length {
            return Err(PayrollError::validation(
                "body",
                format!("must be 1 to {} characters", max_length),
            ));
        }

        let message = ChatMessage {
            id: Uuid::new_v4(),
            company_id: session.company_id,
            author: session.display_name.clone(),
            body: body.to_string(),
            sent_at: Utc::now(),
        };
        self.store.insert_message(message.clone()).await?;
        Ok(message)
    }

    /// Returns the latest chat messages in the order they were sent.
    pub async fn list_messages(&self, session: &Session, limit: Option<usize>) -> PayrollResult<Vec<ChatMessage>> {
        let limit = self.list_limit(limit);
        self.store.list_messages(session.company_id, limit).await
    }

    /// Returns the latest audit entries, newest first.
    pub async fn list_audit(&self, session: &Session, limit: Option<usize>) -> PayrollResult<Vec<AuditEntry>> {
        require_admin(session)?;
        let limit = self.list_limit(limit);
        self.store.list_audit(session.company_id, limit).await
    }

    fn list_limit(&self, requested: Option<usize>) -> usize {
        let default = self.policy.default_list_limit;
        requested.filter(|n| *n > 0).map_or(default, |n| n.min(default * 10))
    }
}
