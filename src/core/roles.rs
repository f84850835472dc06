//! Role derivation for a portal session.
//!
//! Role is never stored on the user record; it is recomputed here on
//! every auth-state change from the email pattern and the mentor
//! approval record. Callers must refresh the credential before passing
//! identity attributes in, so the email/verification flags are current.

use lazy_static::lazy_static;
use regex::Regex;

use super::config::PortalConfig;
use super::error::AlertsError;
use super::model::{Actor, Identity, MentorApprovalRecord, MentorApprovalStatus, Role};

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^([^@\s]+)@([^@\s]+)$").expect("Invalid email regex");
}

/// Lookup capability for mentor approval records.
pub trait MentorDirectory {
    fn approval_record(&self, uid: &str) -> Result<Option<MentorApprovalRecord>, AlertsError>;
}

/// Session-scoped resolution result, passed explicitly to every
/// component that needs role or department.
#[derive(Debug, Clone)]
pub struct Session {
    pub actor: Actor,
    /// Student whose email is not yet verified; gates portal features.
    pub awaiting_verification: bool,
    /// Raw mentor status, kept so the UI can tell a rejected applicant
    /// apart from someone who never applied.
    pub mentor_status: Option<MentorApprovalStatus>,
}

/// Split an email into (local part, domain), both lowercased.
fn split_email(email: &str) -> Option<(String, String)> {
    let caps = EMAIL_RE.captures(email.trim())?;
    Some((caps[1].to_lowercase(), caps[2].to_lowercase()))
}

/// Derive the session for an identity. Pure in (identity, mentor
/// record, config); a failed mentor lookup fails closed to student
/// rather than granting elevated access.
pub fn resolve_session(
    identity: &Identity,
    directory: &impl MentorDirectory,
    config: &PortalConfig,
) -> Session {
    let email_lower = identity.email.trim().to_lowercase();

    let (role, department, mentor_status) = if email_lower == config.super_admin_email.to_lowercase()
    {
        (Role::Admin, None, None)
    } else if let Some((local, domain)) = split_email(&email_lower) {
        if domain == config.department_domain.to_lowercase() {
            (Role::Department, Some(config.department_name(&local)), None)
        } else {
            resolve_mentor_or_student(&identity.id, directory)
        }
    } else {
        // Unparseable address cannot be institutional; fall through to
        // the mentor/student path.
        resolve_mentor_or_student(&identity.id, directory)
    };

    let awaiting_verification = role == Role::Student && !identity.email_verified;

    Session {
        actor: Actor {
            id: identity.id.clone(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            role,
            department,
        },
        awaiting_verification,
        mentor_status,
    }
}

fn resolve_mentor_or_student(
    uid: &str,
    directory: &impl MentorDirectory,
) -> (Role, Option<String>, Option<MentorApprovalStatus>) {
    match directory.approval_record(uid) {
        Ok(Some(record)) => {
            let role = match record.status {
                MentorApprovalStatus::Approved => Role::Mentor,
                MentorApprovalStatus::Pending => Role::PendingMentor,
                // Rejected applicants use the portal as students; the
                // status stays on the session for the UI.
                MentorApprovalStatus::Rejected => Role::Student,
            };
            (role, None, Some(record.status))
        }
        Ok(None) => (Role::Student, None, None),
        Err(e) => {
            // Fail closed: portal access stays available, elevated
            // access does not.
            log::warn!("mentor record lookup failed for {uid}, resolving as student: {e}");
            (Role::Student, None, None)
        }
    }
}
