//! Server-side alert handler.
//!
//! Stateless, one invocation per request; the store is the sole arbiter
//! of write ordering and no state is shared across requests. Success is
//! reported only after both the incident row and the admin notification
//! have been persisted, so a 200 implies both side effects happened.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::core::error::AlertsError;
use crate::core::model::{AudienceDescriptor, NotificationKind, NotificationRecord, Role};
use crate::core::store::{IncidentStore, NotificationStore};

pub const FALLBACK_DISPLAY_NAME: &str = "Unnamed User";
pub const FALLBACK_EMAIL: &str = "No Email Provided";

/// Request body of the alert endpoint. Coordinates are required;
/// identity display fields fall back server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertBody {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Wire-level request as the serverless runtime hands it over.
#[derive(Debug, Clone)]
pub struct AlertRequest {
    pub method: String,
    /// Raw `Authorization` header, if any.
    pub authorization: Option<String>,
    pub body: AlertBody,
}

#[derive(Debug, Clone)]
pub struct AlertResponse {
    pub status: u16,
    pub body: serde_json::Value,
    /// `Access-Control-Allow-Origin` value; the portal origin.
    pub allow_origin: String,
}

/// Identity established from a verified bearer credential.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub uid: String,
}

/// Credential check against the identity service. Expiry must come
/// back as `AlertsError::Auth` so the client can prompt
/// reauthentication instead of retrying blindly.
pub trait CredentialVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedIdentity, AlertsError>;
}

pub struct AlertHandler<'a, V, S> {
    verifier: &'a V,
    store: &'a S,
    allowed_origin: String,
}

impl<'a, V, S> AlertHandler<'a, V, S>
where
    V: CredentialVerifier,
    S: IncidentStore + NotificationStore,
{
    pub fn new(verifier: &'a V, store: &'a S, allowed_origin: impl Into<String>) -> Self {
        Self {
            verifier,
            store,
            allowed_origin: allowed_origin.into(),
        }
    }

    fn respond(&self, status: u16, body: serde_json::Value) -> AlertResponse {
        AlertResponse {
            status,
            body,
            allow_origin: self.allowed_origin.clone(),
        }
    }

    pub fn handle(&self, request: &AlertRequest) -> AlertResponse {
        if request.method != "POST" {
            return self.respond(405, json!({ "error": "Method Not Allowed" }));
        }

        let token = match request
            .authorization
            .as_deref()
            .and_then(|header| header.strip_prefix("Bearer "))
        {
            Some(token) if !token.is_empty() => token,
            _ => {
                log::error!("alert request without a valid authorization token");
                return self.respond(401, json!({ "error": "Unauthorized: No token provided." }));
            }
        };

        // Missing coordinates are a client bug, distinguished from auth
        // failure.
        let (latitude, longitude) = match (request.body.latitude, request.body.longitude) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => {
                return self.respond(400, json!({ "error": "Bad Request: Missing location data." }));
            }
        };

        let identity = match self.verifier.verify(token) {
            Ok(identity) => identity,
            Err(AlertsError::Auth(reason)) => {
                log::error!("alert credential rejected: {reason}");
                return self
                    .respond(401, json!({ "error": "Unauthorized: Invalid or expired token." }));
            }
            Err(e) => {
                log::error!("error verifying alert credential: {e}");
                return self.respond(500, json!({ "error": "Internal Server Error" }));
            }
        };

        let user_name = request
            .body
            .display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_DISPLAY_NAME);
        let user_email = request
            .body
            .email
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_EMAIL);

        if let Err(e) =
            self.store
                .record_incident(&identity.uid, user_name, user_email, latitude, longitude)
        {
            log::error!("error persisting emergency incident: {e}");
            return self.respond(500, json!({ "error": "Internal Server Error" }));
        }

        let notification = NotificationRecord::new(
            AudienceDescriptor::Role(Role::Admin),
            NotificationKind::EmergencySos,
            format!("SOS ALERT: {user_name} has triggered an emergency alert."),
        );
        if let Err(e) = self.store.create(notification) {
            log::error!("error persisting emergency notification: {e}");
            return self.respond(500, json!({ "error": "Internal Server Error" }));
        }

        log::info!(
            "logged emergency and notified admins for {user_name} ({})",
            identity.uid
        );
        self.respond(
            200,
            json!({ "success": true, "message": "Alert successfully logged and admin notified." }),
        )
    }
}
