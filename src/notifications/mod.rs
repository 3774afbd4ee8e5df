//! Notification feed for plan events.
//!
//! The board pushes a [`Notification`] whenever a plan is created, becomes
//! production ready, falls back to pending readiness, or starts production.
//! The feed is held in memory, newest first.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

/// Kinds of plan events surfaced to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub enum NotificationKind {
    #[serde(rename = "New Plan")]
    NewPlan,
    #[serde(rename = "Readiness Pending")]
    ReadinessPending,
    #[serde(rename = "Production Ready")]
    ProductionReady,
    #[serde(rename = "Production Started")]
    ProductionStarted,
}

/// A single feed entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub plan_id: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("notification {0} not found")]
    NotFound(Uuid),
}

/// In-memory notification feed
#[derive(Debug, Clone, Default)]
pub struct NotificationFeed {
    // oldest first; reversed on read
    entries: Vec<Notification>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an unread notification and return it
    pub fn push(
        &mut self,
        kind: NotificationKind,
        plan_id: &str,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> &Notification {
        let message = message.into();
        tracing::debug!(plan_id, ?kind, %message, "Notification queued");

        self.entries.push(Notification {
            id: Uuid::new_v4(),
            kind,
            message,
            plan_id: plan_id.to_string(),
            read: false,
            created_at: now,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// All notifications, newest first
    pub fn list(&self) -> Vec<&Notification> {
        self.entries.iter().rev().collect()
    }

    /// Notifications concerning one plan, newest first
    pub fn for_plan(&self, plan_id: &str) -> Vec<&Notification> {
        self.entries
            .iter()
            .rev()
            .filter(|n| n.plan_id == plan_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    /// Mark one notification read
    pub fn mark_read(&mut self, id: Uuid) -> Result<&Notification, NotificationError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(NotificationError::NotFound(id))?;
        entry.read = true;
        Ok(&*entry)
    }

    /// Mark everything read, returning how many changed
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for entry in self.entries.iter_mut().filter(|n| !n.read) {
            entry.read = true;
            changed += 1;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_lists_newest_first() {
        let mut feed = NotificationFeed::new();
        let now = Utc::now();
        feed.push(NotificationKind::NewPlan, "PLAN-001", "first", now);
        feed.push(NotificationKind::ProductionReady, "PLAN-001", "second", now);

        let list = feed.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].message, "second");
        assert_eq!(list[1].message, "first");
        assert_eq!(feed.unread_count(), 2);
    }

    #[test]
    fn test_mark_read() {
        let mut feed = NotificationFeed::new();
        let id = feed
            .push(NotificationKind::NewPlan, "PLAN-001", "created", Utc::now())
            .id;

        assert!(feed.mark_read(id).unwrap().read);
        assert_eq!(feed.unread_count(), 0);

        let missing = Uuid::new_v4();
        assert_eq!(
            feed.mark_read(missing).unwrap_err(),
            NotificationError::NotFound(missing)
        );
    }

    #[test]
    fn test_mark_all_read_counts_changes() {
        let mut feed = NotificationFeed::new();
        let now = Utc::now();
        let id = feed.push(NotificationKind::NewPlan, "PLAN-001", "a", now).id;
        feed.push(NotificationKind::NewPlan, "PLAN-002", "b", now);
        feed.push(NotificationKind::ProductionStarted, "PLAN-001", "c", now);
        feed.mark_read(id).unwrap();

        assert_eq!(feed.mark_all_read(), 2);
        assert_eq!(feed.mark_all_read(), 0);
        assert_eq!(feed.for_plan("PLAN-001").len(), 2);
    }

    #[test]
    fn test_kind_wire_labels() {
        let json = serde_json::to_string(&NotificationKind::ReadinessPending).unwrap();
        assert_eq!(json, "\"Readiness Pending\"");
    }
}
