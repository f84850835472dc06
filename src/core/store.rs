//! Store adapter boundary.
//!
//! The document store itself is external; this module defines the
//! persistence and live-subscription surface the subsystem needs, plus
//! an in-memory implementation backed by a broadcast channel. A live
//! subscription is a standing filtered query: the receiver gets every
//! record written after subscription whose audience equals its filter,
//! and teardown is dropping the subscription handle.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Mutex;

use tokio::sync::broadcast;

use super::error::AlertsError;
use super::model::{
    AudienceDescriptor, EmergencyIncident, Notification, NotificationId, NotificationRecord,
};

/// Capacity of the change feed; a consumer that lags this far behind
/// misses records and should refetch.
const CHANGE_FEED_CAPACITY: usize = 256;

pub trait NotificationStore {
    fn create(&self, record: NotificationRecord) -> Result<Notification, AlertsError>;
    /// Flip the read flag to true. Idempotent; a read notification
    /// never reverts to unread.
    fn mark_read(&self, id: &NotificationId) -> Result<(), AlertsError>;
    fn fetch(&self, filter: &AudienceDescriptor) -> Result<Vec<Notification>, AlertsError>;
    fn subscribe(&self, filter: AudienceDescriptor) -> NotificationSubscription;
}

/// Persistence surface for the emergency log.
pub trait IncidentStore {
    fn record_incident(
        &self,
        user_id: &str,
        user_name: &str,
        user_email: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<EmergencyIncident, AlertsError>;
}

/// Receiver half of a live subscription. Dropping it tears the
/// subscription down.
pub struct NotificationSubscription {
    filter: AudienceDescriptor,
    rx: broadcast::Receiver<Notification>,
}

impl NotificationSubscription {
    /// Next notification matching this subscription's filter, or None
    /// once the store is gone.
    pub async fn next(&mut self) -> Option<Notification> {
        loop {
            match self.rx.recv().await {
                Ok(notification) => {
                    if notification.record.audience() == self.filter {
                        return Some(notification);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    log::warn!("subscription lagged, {missed} records skipped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn filter(&self) -> &AudienceDescriptor {
        &self.filter
    }
}

/// In-memory store used by tests and as the reference implementation of
/// the adapter contract.
pub struct InMemoryStore {
    notifications: Mutex<Vec<Notification>>,
    incidents: Mutex<Vec<EmergencyIncident>>,
    next_id: AtomicU64,
    tx: broadcast::Sender<Notification>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            notifications: Mutex::new(Vec::new()),
            incidents: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            tx,
        }
    }

    fn allocate_id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, AtomicOrdering::SeqCst))
    }

    pub fn incidents(&self) -> Vec<EmergencyIncident> {
        self.incidents.lock().expect("incident store poisoned").clone()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationStore for InMemoryStore {
    fn create(&self, record: NotificationRecord) -> Result<Notification, AlertsError> {
        let notification = Notification {
            id: self.allocate_id("n"),
            record,
        };
        self.notifications
            .lock()
            .map_err(|_| AlertsError::Persistence("notification store poisoned".into()))?
            .push(notification.clone());
        // No receivers is fine; delivery only matters for open
        // subscriptions.
        let _ = self.tx.send(notification.clone());
        Ok(notification)
    }

    fn mark_read(&self, id: &NotificationId) -> Result<(), AlertsError> {
        let mut notifications = self
            .notifications
            .lock()
            .map_err(|_| AlertsError::Persistence("notification store poisoned".into()))?;
        match notifications.iter_mut().find(|n| n.id == *id) {
            Some(notification) => {
                notification.record.is_read = true;
                Ok(())
            }
            None => Err(AlertsError::Persistence(format!(
                "no notification with id {id}"
            ))),
        }
    }

    fn fetch(&self, filter: &AudienceDescriptor) -> Result<Vec<Notification>, AlertsError> {
        let notifications = self
            .notifications
            .lock()
            .map_err(|_| AlertsError::Persistence("notification store poisoned".into()))?;
        Ok(notifications
            .iter()
            .filter(|n| n.record.audience() == *filter)
            .cloned()
            .collect())
    }

    fn subscribe(&self, filter: AudienceDescriptor) -> NotificationSubscription {
        NotificationSubscription {
            filter,
            rx: self.tx.subscribe(),
        }
    }
}

impl IncidentStore for InMemoryStore {
    fn record_incident(
        &self,
        user_id: &str,
        user_name: &str,
        user_email: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<EmergencyIncident, AlertsError> {
        let incident = EmergencyIncident {
            id: self.allocate_id("e"),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            user_email: user_email.to_string(),
            latitude,
            longitude,
            created_at: chrono::Utc::now(),
        };
        self.incidents
            .lock()
            .map_err(|_| AlertsError::Persistence("incident store poisoned".into()))?
            .push(incident.clone());
        Ok(incident)
    }
}
