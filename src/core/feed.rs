//! Client-side notification feed.
//!
//! A reducer that folds live-subscription change events into an ordered
//! list for one actor. Every fold step re-checks the audience predicate
//! (a misconfigured subscription filter must never cause a
//! wrong-audience display) and re-sorts under the priority order.

use super::audience;
use super::model::{Actor, Notification, NotificationId, NotificationKind, Role, UrgencyClass};
use super::ordering;

/// Incremental change delivered by a live subscription.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    Added(Notification),
    Updated(Notification),
    Removed(NotificationId),
}

/// Portal view a notification click navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalRoute {
    /// The one urgency-driven route: emergency-class notifications
    /// always land on the emergency log.
    EmergencyLog,
    ComplaintsDashboard,
    Leave,
    LeaveManagement,
    MentorApproval,
    MentorDirectory,
    MentorDashboard,
    LostAndFound,
}

/// Navigation rule for a clicked notification. Emergency class routes
/// by urgency; everything else routes by category and viewer role.
pub fn route_for(notification: &Notification, viewer_role: Role) -> Option<PortalRoute> {
    if notification.record.urgency() == UrgencyClass::Emergency {
        return Some(PortalRoute::EmergencyLog);
    }
    match notification.record.kind {
        NotificationKind::Complaint | NotificationKind::Escalation => {
            Some(PortalRoute::ComplaintsDashboard)
        }
        NotificationKind::Leave => Some(if viewer_role == Role::Student {
            PortalRoute::Leave
        } else {
            PortalRoute::LeaveManagement
        }),
        NotificationKind::MentorApproval => Some(PortalRoute::MentorApproval),
        NotificationKind::Mentor => Some(if viewer_role == Role::Student {
            PortalRoute::MentorDirectory
        } else {
            PortalRoute::MentorDashboard
        }),
        NotificationKind::LostItem => Some(PortalRoute::LostAndFound),
        NotificationKind::EmergencySos => Some(PortalRoute::EmergencyLog),
        NotificationKind::Chat => None,
    }
}

/// Result of opening a notification from the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOutcome {
    /// True the first time this notification is opened; the caller
    /// persists the read flag exactly then.
    pub newly_read: bool,
    pub route: Option<PortalRoute>,
}

/// Ordered notification list for one signed-in actor.
pub struct NotificationFeed {
    actor: Actor,
    items: Vec<Notification>,
}

impl NotificationFeed {
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            items: Vec::new(),
        }
    }

    /// Seed the feed from an initial fetch, dropping anything the
    /// defensive audience check rejects.
    pub fn load(&mut self, notifications: Vec<Notification>) {
        self.items = notifications
            .into_iter()
            .filter(|n| audience::matches(&n.record.audience(), &self.actor))
            .collect();
        ordering::sort(&mut self.items);
    }

    /// Fold one subscription event into the list and re-sort.
    pub fn apply(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Added(notification) | FeedEvent::Updated(notification) => {
                if !audience::matches(&notification.record.audience(), &self.actor) {
                    log::warn!(
                        "dropping notification {} delivered outside its audience",
                        notification.id
                    );
                    return;
                }
                match self.items.iter_mut().find(|n| n.id == notification.id) {
                    Some(existing) => *existing = notification,
                    None => self.items.push(notification),
                }
            }
            FeedEvent::Removed(id) => {
                self.items.retain(|n| n.id != id);
            }
        }
        ordering::sort(&mut self.items);
    }

    /// Open a notification: flips the local read flag the first time
    /// only and reports where to navigate.
    pub fn open(&mut self, id: &NotificationId) -> Option<OpenOutcome> {
        let viewer_role = self.actor.role;
        let notification = self.items.iter_mut().find(|n| n.id == *id)?;
        let newly_read = !notification.record.is_read;
        notification.record.is_read = true;
        Some(OpenOutcome {
            newly_read,
            route: route_for(notification, viewer_role),
        })
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.record.is_read).count()
    }
}
