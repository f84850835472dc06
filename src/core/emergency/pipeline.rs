//! Client-side emergency alert pipeline.
//!
//! Explicit state machine:
//! Idle -> AwaitingFirstConfirm -> AwaitingLocationConfirm -> InFlight
//! -> Succeeded | Failed. Two independent confirmations are mandatory
//! before any network or sensor access; declining either leaves zero
//! side effects. Failed is terminal for the invocation and nothing is
//! retried automatically, since a retried safety broadcast risks
//! duplicate dispatch to responders.

use std::time::Duration;

use super::handler::AlertBody;
use crate::core::error::AlertsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SosState {
    Idle,
    AwaitingFirstConfirm,
    AwaitingLocationConfirm,
    InFlight,
    Succeeded,
    Failed,
}

/// One-shot location fix.
#[derive(Debug, Clone, Copy)]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
}

/// Fresh-credential source. Must not serve a cached token.
pub trait CredentialProvider {
    fn fresh_token(&self) -> Result<String, AlertsError>;
}

/// One-shot, high-accuracy position read with a bounded wait and no
/// cached fix.
pub trait Geolocator {
    fn current_position(&self, timeout: Duration) -> Result<GeoFix, AlertsError>;
}

/// Response as observed by the client transport; anything that
/// completed, whatever the status.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub message: Option<String>,
}

/// The POST to the alert endpoint. Errors mean the request never
/// completed.
pub trait AlertTransport {
    fn send(&self, token: &str, body: &AlertBody) -> Result<TransportResponse, AlertsError>;
}

/// Confirmation dialog content presented between transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SosPrompt {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
}

/// Terminal modal: a single dismiss action, never an ambiguous state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SosModal {
    pub title: String,
    pub message: String,
}

pub struct SosPipeline<C, G, T> {
    credentials: C,
    geolocator: G,
    transport: T,
    location_timeout: Duration,
    display_name: Option<String>,
    email: Option<String>,
    state: SosState,
}

impl<C, G, T> SosPipeline<C, G, T>
where
    C: CredentialProvider,
    G: Geolocator,
    T: AlertTransport,
{
    pub fn new(
        credentials: C,
        geolocator: G,
        transport: T,
        location_timeout: Duration,
        display_name: Option<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            credentials,
            geolocator,
            transport,
            location_timeout,
            display_name,
            email,
            state: SosState::Idle,
        }
    }

    pub fn state(&self) -> SosState {
        self.state
    }

    /// The actor invoked the alert action. No network or sensor access
    /// happens here.
    pub fn trigger(&mut self) -> Option<SosPrompt> {
        if self.state != SosState::Idle {
            log::warn!("sos trigger ignored in state {:?}", self.state);
            return None;
        }
        self.state = SosState::AwaitingFirstConfirm;
        Some(SosPrompt {
            title: "Emergency Alert".to_string(),
            message: "Are you sure you want to send an emergency alert? This will notify campus security and admins.".to_string(),
            confirm_label: "Send SOS".to_string(),
        })
    }

    /// First explicit confirmation; presents the distinct location
    /// disclosure. A single confirmation never starts the pipeline.
    pub fn confirm_first(&mut self) -> Option<SosPrompt> {
        if self.state != SosState::AwaitingFirstConfirm {
            log::warn!("sos first confirm ignored in state {:?}", self.state);
            return None;
        }
        self.state = SosState::AwaitingLocationConfirm;
        Some(SosPrompt {
            title: "Confirm Location Sharing".to_string(),
            message: "This action will share your live location with campus security and admins. Are you absolutely sure you want to proceed?".to_string(),
            confirm_label: "Yes, Send Alert".to_string(),
        })
    }

    /// Declining either prompt abandons the invocation with zero side
    /// effects.
    pub fn decline(&mut self) {
        match self.state {
            SosState::AwaitingFirstConfirm | SosState::AwaitingLocationConfirm => {
                self.state = SosState::Idle;
            }
            _ => log::warn!("sos decline ignored in state {:?}", self.state),
        }
    }

    /// Dismiss the terminal modal; the action may then be re-invoked
    /// from Idle.
    pub fn dismiss(&mut self) {
        match self.state {
            SosState::Succeeded | SosState::Failed => self.state = SosState::Idle,
            _ => log::warn!("sos dismiss ignored in state {:?}", self.state),
        }
    }

    /// Second explicit confirmation: acquire credential and location,
    /// then submit. Runs to completion; no mid-flight cancellation.
    pub fn confirm_location(&mut self) -> Option<SosModal> {
        if self.state != SosState::AwaitingLocationConfirm {
            log::warn!("sos location confirm ignored in state {:?}", self.state);
            return None;
        }
        self.state = SosState::InFlight;
        let modal = self.submit();
        Some(modal)
    }

    fn submit(&mut self) -> SosModal {
        let token = match self.credentials.fresh_token() {
            Ok(token) => token,
            Err(e) => {
                log::error!("sos credential acquisition failed: {e}");
                return if e.needs_reauth() {
                    self.fail(
                        "Authentication Error",
                        "Authentication error. Please sign out and sign back in.",
                    )
                } else {
                    self.fail(
                        "Error Sending Alert",
                        &format!("Failed to send alert: {e}"),
                    )
                };
            }
        };

        let fix = match self.geolocator.current_position(self.location_timeout) {
            Ok(fix) => fix,
            Err(AlertsError::GeoDenied) => {
                return self.fail(
                    "Error Sending Alert",
                    "Location access was denied. Please enable location services in your browser settings to use this feature.",
                );
            }
            Err(AlertsError::GeoTimeout) => {
                return self.fail(
                    "Error Sending Alert",
                    "Could not get your location in time. Please try again or check your signal.",
                );
            }
            Err(e) => {
                log::error!("sos location read failed: {e}");
                return self.fail(
                    "Error Sending Alert",
                    "Could not determine your location. Please try again.",
                );
            }
        };

        let body = AlertBody {
            latitude: Some(fix.latitude),
            longitude: Some(fix.longitude),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
        };

        match self.transport.send(&token, &body) {
            Ok(response) if response.status == 200 => {
                self.state = SosState::Succeeded;
                SosModal {
                    title: "Alert Sent".to_string(),
                    message: "Emergency alert sent successfully! Help is on the way. Stay safe!"
                        .to_string(),
                }
            }
            Ok(response) if response.status == 401 => self.fail(
                "Authentication Error",
                "Your session has expired. Please sign out and sign back in, then try again.",
            ),
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| "Failed to send alert. Please try again.".to_string());
                self.fail("Error Sending Alert", &format!("Failed to send alert: {message}"))
            }
            Err(e) => {
                log::error!("sos request failed to complete: {e}");
                self.fail("Error Sending Alert", &format!("Failed to send alert: {e}"))
            }
        }
    }

    fn fail(&mut self, title: &str, message: &str) -> SosModal {
        self.state = SosState::Failed;
        SosModal {
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}
