// Shared domain types for the notification subsystem.
//
// NOTE: field names on persisted types mirror the document store schema
// (camelCase). Keep serde renames in sync with the store collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ActorId = String;
pub type NotificationId = String;

/// Portal role, derived on every session start. Never stored on the
/// user record directly; see `roles::resolve_session`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Mentor,
    PendingMentor,
    Department,
    Admin,
}

/// A signed-in portal user with their derived role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub email: String,
    pub display_name: Option<String>,
    pub role: Role,
    /// Only set for `Role::Department`; derived from the email local part.
    pub department: Option<String>,
}

/// Raw identity attributes as the auth provider reports them, before
/// role derivation.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: ActorId,
    pub email: String,
    pub display_name: Option<String>,
    pub email_verified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentorApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

/// Mentor application record, written at signup and mutated only by an
/// admin approval action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorApprovalRecord {
    pub uid: ActorId,
    pub status: MentorApprovalStatus,
}

/// Category tag carried in the persisted `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Complaint,
    Escalation,
    Leave,
    MentorApproval,
    Mentor,
    LostItem,
    EmergencySos,
    Chat,
}

/// Coarse priority tier. Emergency always outranks normal regardless of
/// numeric priority or recency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UrgencyClass {
    Emergency,
    Normal,
}

impl NotificationKind {
    pub fn urgency(self) -> UrgencyClass {
        match self {
            Self::EmergencySos => UrgencyClass::Emergency,
            _ => UrgencyClass::Normal,
        }
    }
}

/// Targeting rule for a notification. Exactly one variant per record,
/// and it never changes once the record is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudienceDescriptor {
    Recipient(ActorId),
    Role(Role),
    Department(String),
}

/// Persisted notification record, matching the store schema exactly:
/// exactly one of `recipientId`/`recipientRole`/`recipientDept` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<ActorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_dept: Option<String>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    pub fn new(audience: AudienceDescriptor, kind: NotificationKind, message: impl Into<String>) -> Self {
        let (recipient_id, recipient_role, recipient_dept) = match audience {
            AudienceDescriptor::Recipient(id) => (Some(id), None, None),
            AudienceDescriptor::Role(role) => (None, Some(role), None),
            AudienceDescriptor::Department(dept) => (None, None, Some(dept)),
        };
        Self {
            message: message.into(),
            recipient_id,
            recipient_role,
            recipient_dept,
            kind,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    /// Fan-out to all admins when a mentor application is submitted.
    pub fn mentor_signup(name: &str, email: &str) -> Self {
        Self::new(
            AudienceDescriptor::Role(Role::Admin),
            NotificationKind::MentorApproval,
            format!("New mentor registration from {name} ({email}) requires approval."),
        )
    }

    /// Approval or rejection result, delivered to the applicant.
    pub fn mentor_decision(applicant: ActorId, status: MentorApprovalStatus) -> Self {
        let verdict = match status {
            MentorApprovalStatus::Approved => "approved",
            MentorApprovalStatus::Rejected => "rejected",
            MentorApprovalStatus::Pending => "pending review",
        };
        Self::new(
            AudienceDescriptor::Recipient(applicant),
            NotificationKind::Mentor,
            format!("Your mentor application has been {verdict}."),
        )
    }

    /// Status change on a complaint, delivered to the complainant.
    pub fn complaint_update(complainant: ActorId, complaint_title: &str, status: &str) -> Self {
        Self::new(
            AudienceDescriptor::Recipient(complainant),
            NotificationKind::Complaint,
            format!("Your complaint \"{complaint_title}\" is now {status}."),
        )
    }

    /// Escalation fan-out to the responsible department.
    pub fn complaint_escalation(department: String, complaint_title: &str) -> Self {
        Self::new(
            AudienceDescriptor::Department(department),
            NotificationKind::Escalation,
            format!("Complaint \"{complaint_title}\" has been escalated to your department."),
        )
    }

    pub fn audience(&self) -> AudienceDescriptor {
        if let Some(id) = &self.recipient_id {
            AudienceDescriptor::Recipient(id.clone())
        } else if let Some(role) = self.recipient_role {
            AudienceDescriptor::Role(role)
        } else if let Some(dept) = &self.recipient_dept {
            AudienceDescriptor::Department(dept.clone())
        } else {
            // Unreachable for records built through `new`; treat a
            // malformed record as targeting nobody.
            AudienceDescriptor::Recipient(String::new())
        }
    }

    pub fn urgency(&self) -> UrgencyClass {
        self.kind.urgency()
    }
}

/// A stored notification: record plus the store-assigned document id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(flatten)]
    pub record: NotificationRecord,
}

/// One row of the emergency log. Written exactly once per successful
/// alert pipeline run, then immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyIncident {
    pub id: String,
    pub user_id: ActorId,
    pub user_name: String,
    pub user_email: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

/// Read-only view of a complaint, consumed by the ordering engine.
/// Lifecycle belongs to the complaint-management feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintRef {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub is_escalated: bool,
    /// Lower value = more urgent; records without one rank as 3.
    pub priority_level: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sets_exactly_one_recipient_field() {
        let by_id = NotificationRecord::new(
            AudienceDescriptor::Recipient("u1".into()),
            NotificationKind::Leave,
            "Leave approved",
        );
        assert!(by_id.recipient_id.is_some());
        assert!(by_id.recipient_role.is_none());
        assert!(by_id.recipient_dept.is_none());

        let by_role = NotificationRecord::new(
            AudienceDescriptor::Role(Role::Admin),
            NotificationKind::MentorApproval,
            "msg",
        );
        assert!(by_role.recipient_id.is_none());
        assert_eq!(by_role.recipient_role, Some(Role::Admin));

        let by_dept = NotificationRecord::new(
            AudienceDescriptor::Department("Hostel Affairs".into()),
            NotificationKind::Escalation,
            "msg",
        );
        assert_eq!(by_dept.recipient_dept.as_deref(), Some("Hostel Affairs"));
    }

    #[test]
    fn test_wire_field_names_match_store_schema() {
        let record = NotificationRecord::new(
            AudienceDescriptor::Role(Role::Admin),
            NotificationKind::EmergencySos,
            "SOS",
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["recipientRole"], "admin");
        assert_eq!(value["type"], "emergency_sos");
        assert_eq!(value["isRead"], false);
        assert!(value.get("recipientId").is_none());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_only_sos_kind_is_emergency_class() {
        assert_eq!(NotificationKind::EmergencySos.urgency(), UrgencyClass::Emergency);
        assert_eq!(NotificationKind::Complaint.urgency(), UrgencyClass::Normal);
        assert_eq!(NotificationKind::Escalation.urgency(), UrgencyClass::Normal);
    }

    #[test]
    fn test_event_producers_target_the_right_audience() {
        let signup = NotificationRecord::mentor_signup("Jane", "jane@gmail.com");
        assert_eq!(signup.recipient_role, Some(Role::Admin));
        assert_eq!(signup.kind, NotificationKind::MentorApproval);
        assert!(signup.message.contains("jane@gmail.com"));

        let decision =
            NotificationRecord::mentor_decision("u9".into(), MentorApprovalStatus::Approved);
        assert_eq!(decision.recipient_id.as_deref(), Some("u9"));
        assert!(decision.message.contains("approved"));

        let update = NotificationRecord::complaint_update("u3".into(), "Leaky tap", "Resolved");
        assert_eq!(update.recipient_id.as_deref(), Some("u3"));
        assert_eq!(update.kind, NotificationKind::Complaint);

        let escalation =
            NotificationRecord::complaint_escalation("Maintenance".into(), "Leaky tap");
        assert_eq!(escalation.recipient_dept.as_deref(), Some("Maintenance"));
        assert_eq!(escalation.kind, NotificationKind::Escalation);
    }

    #[test]
    fn test_audience_roundtrip() {
        let audience = AudienceDescriptor::Department("IT Department".into());
        let record =
            NotificationRecord::new(audience.clone(), NotificationKind::Escalation, "msg");
        assert_eq!(record.audience(), audience);
    }
}
