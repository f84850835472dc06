//! Priority ordering over notification-like items.
//!
//! Total order: emergency class first, then escalated items, then
//! ascending numeric priority (missing = 3), ties broken by most
//! recent. The sort is stable and is re-run on every collection change,
//! not once at load time.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::model::{ComplaintRef, Notification, UrgencyClass};

pub const DEFAULT_PRIORITY_LEVEL: i32 = 3;

/// Anything the engine can order: notifications, complaints, and any
/// future attention-routing item.
pub trait Orderable {
    fn urgency(&self) -> UrgencyClass;
    fn escalated(&self) -> bool {
        false
    }
    fn priority_level(&self) -> i32 {
        DEFAULT_PRIORITY_LEVEL
    }
    fn created_at(&self) -> DateTime<Utc>;
}

impl Orderable for Notification {
    fn urgency(&self) -> UrgencyClass {
        self.record.urgency()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.record.created_at
    }
}

impl Orderable for ComplaintRef {
    fn urgency(&self) -> UrgencyClass {
        UrgencyClass::Normal
    }

    fn escalated(&self) -> bool {
        self.is_escalated
    }

    fn priority_level(&self) -> i32 {
        self.priority_level.unwrap_or(DEFAULT_PRIORITY_LEVEL)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Compare two items under the display order.
pub fn compare<T: Orderable>(a: &T, b: &T) -> Ordering {
    a.urgency()
        .cmp(&b.urgency())
        .then_with(|| b.escalated().cmp(&a.escalated()))
        .then_with(|| a.priority_level().cmp(&b.priority_level()))
        .then_with(|| b.created_at().cmp(&a.created_at()))
}

/// Stable in-place sort under the display order.
pub fn sort<T: Orderable>(items: &mut [T]) {
    items.sort_by(compare);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{AudienceDescriptor, NotificationKind, NotificationRecord, Role};
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn notification(kind: NotificationKind, created_at: DateTime<Utc>) -> Notification {
        let mut record =
            NotificationRecord::new(AudienceDescriptor::Role(Role::Admin), kind, "msg");
        record.created_at = created_at;
        Notification {
            id: format!("n-{}", created_at.timestamp()),
            record,
        }
    }

    fn complaint(
        id: &str,
        escalated: bool,
        priority: Option<i32>,
        created_at: DateTime<Utc>,
    ) -> ComplaintRef {
        ComplaintRef {
            id: id.to_string(),
            status: "Open".to_string(),
            is_escalated: escalated,
            priority_level: priority,
            created_at,
        }
    }

    #[test]
    fn test_emergency_sorts_first_regardless_of_recency() {
        // Older emergency vs newer normal item.
        let mut items = vec![
            notification(NotificationKind::Complaint, at(100)),
            notification(NotificationKind::EmergencySos, at(50)),
        ];
        sort(&mut items);
        assert_eq!(items[0].record.kind, NotificationKind::EmergencySos);
    }

    #[test]
    fn test_first_item_is_emergency_when_any_present() {
        let mut items = vec![
            notification(NotificationKind::Leave, at(10)),
            notification(NotificationKind::Mentor, at(20)),
            notification(NotificationKind::EmergencySos, at(1)),
            notification(NotificationKind::LostItem, at(30)),
        ];
        sort(&mut items);
        assert_eq!(items[0].record.urgency(), UrgencyClass::Emergency);
    }

    #[test]
    fn test_escalated_never_sorts_after_non_escalated() {
        let mut items = vec![
            complaint("plain", false, Some(1), at(100)),
            complaint("escalated", true, Some(5), at(10)),
        ];
        sort(&mut items);
        assert_eq!(items[0].id, "escalated");
    }

    #[test]
    fn test_lower_priority_level_first() {
        let mut items = vec![
            complaint("p3", false, None, at(10)),
            complaint("p1", false, Some(1), at(10)),
            complaint("p2", false, Some(2), at(10)),
        ];
        sort(&mut items);
        let ids: Vec<&str> = items.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p2", "p3"]);
    }

    #[test]
    fn test_missing_priority_defaults_to_three() {
        let mut items = vec![
            complaint("implicit", false, None, at(10)),
            complaint("worse", false, Some(4), at(10)),
        ];
        sort(&mut items);
        assert_eq!(items[0].id, "implicit");
    }

    #[test]
    fn test_ties_break_by_most_recent() {
        let mut items = vec![
            complaint("old", false, Some(2), at(10)),
            complaint("new", false, Some(2), at(20)),
        ];
        sort(&mut items);
        assert_eq!(items[0].id, "new");
    }

    #[test]
    fn test_compare_is_consistent_with_sort() {
        let emergency = notification(NotificationKind::EmergencySos, at(100));
        let normal = notification(NotificationKind::Complaint, at(200));
        assert_eq!(compare(&emergency, &normal), Ordering::Less);
        assert_eq!(compare(&normal, &emergency), Ordering::Greater);
    }
}
