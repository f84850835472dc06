//! Audience matching for notifications.
//!
//! The same predicate is used twice: once to build the live
//! subscription filter for a session, and again defensively on the
//! client after delivery so a misconfigured filter never causes a
//! wrong-audience display.

use super::model::{Actor, AudienceDescriptor, Role};

/// Does a notification with this audience descriptor belong to this actor?
pub fn matches(audience: &AudienceDescriptor, actor: &Actor) -> bool {
    match audience {
        AudienceDescriptor::Recipient(id) => actor.id == *id,
        AudienceDescriptor::Role(role) => actor.role == *role,
        // Department fan-out targets the department login, not every
        // role=department actor, so name must match too.
        AudienceDescriptor::Department(dept) => {
            actor.role == Role::Department && actor.department.as_deref() == Some(dept.as_str())
        }
    }
}

/// Build the single subscription predicate for a session. Must be
/// rebuilt (and the subscription re-issued) whenever role or department
/// changes, e.g. on reauthentication.
pub fn subscription_filter(actor: &Actor) -> Option<AudienceDescriptor> {
    match actor.role {
        // Students and mentors (including applicants awaiting a
        // decision) receive notifications addressed to them directly.
        Role::Student | Role::Mentor | Role::PendingMentor => {
            Some(AudienceDescriptor::Recipient(actor.id.clone()))
        }
        Role::Admin => Some(AudienceDescriptor::Role(Role::Admin)),
        Role::Department => actor
            .department
            .clone()
            .map(AudienceDescriptor::Department),
    }
}
