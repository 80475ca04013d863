//! Terminal stand-in for platform notifications and haptics.
//!
//! Scheduled notifications and haptic pulses become log lines on stderr.

use pauseroom_core::config::NotificationsConfig;
use pauseroom_core::{
    format_long, GatewayError, GatewayRequest, NotificationSink, PermissionStatus,
};
use tracing::{debug, info};

pub struct ConsoleSink {
    prefs: NotificationsConfig,
}

impl ConsoleSink {
    pub fn new(prefs: NotificationsConfig) -> Self {
        Self { prefs }
    }
}

impl NotificationSink for ConsoleSink {
    fn permission(&self) -> PermissionStatus {
        if self.prefs.enabled {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    fn deliver(&mut self, request: &GatewayRequest) -> Result<(), GatewayError> {
        match request {
            GatewayRequest::Schedule { content, delay_secs } => {
                let delay = i64::try_from(*delay_secs).unwrap_or(i64::MAX);
                info!(
                    sound = self.prefs.sound,
                    "notification \"{}\" scheduled in {}: {}",
                    content.title,
                    format_long(delay),
                    content.body
                );
            }
            GatewayRequest::CancelAll => info!("scheduled notifications cancelled"),
            GatewayRequest::Impact { style } if self.prefs.vibration => {
                debug!(?style, "haptic impact");
            }
            GatewayRequest::Feedback { kind } if self.prefs.vibration => {
                info!(?kind, "haptic feedback");
            }
            GatewayRequest::Impact { .. } | GatewayRequest::Feedback { .. } => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pauseroom_core::{NotificationContent, NotificationKind};

    #[test]
    fn disabled_notifications_deny_permission() {
        let sink = ConsoleSink::new(NotificationsConfig {
            enabled: false,
            ..NotificationsConfig::default()
        });
        assert_eq!(sink.permission(), PermissionStatus::Denied);
    }

    #[test]
    fn delivery_never_fails() {
        let mut sink = ConsoleSink::new(NotificationsConfig::default());
        let request = GatewayRequest::Schedule {
            content: NotificationContent::for_kind(NotificationKind::Break),
            delay_secs: 600,
        };
        assert!(sink.deliver(&request).is_ok());
        assert!(sink.deliver(&GatewayRequest::CancelAll).is_ok());
    }
}
