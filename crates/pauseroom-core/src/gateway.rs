//! Notification and haptic gateway.
//!
//! The phase timer talks to the outside world only through [`Gateway`].
//! Notification calls may fail; the timer logs and drops those failures.
//! Haptic calls are fire-and-forget and cannot fail.
//!
//! [`ChannelGateway`] turns every call into a one-way message so the timer
//! never waits on delivery. [`spawn_dispatcher`] drains that channel into a
//! [`NotificationSink`] on its own task.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::GatewayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Success,
    Warning,
    Error,
}

/// Whether the host allows local notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// Which scheduled notification a request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Work phase is over, take a break.
    Break,
    /// Break is over, back to work.
    Work,
}

/// User-facing text of a scheduled notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
}

impl NotificationContent {
    pub fn for_kind(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Break => Self {
                title: "⏰ Break time!".into(),
                body: "Time to take a break for your well-being!".into(),
                kind,
            },
            NotificationKind::Work => Self {
                title: "🚀 Back to work!".into(),
                body: "Your break is over, let's get back to work!".into(),
                kind,
            },
        }
    }
}

/// Capability the phase timer uses at phase boundaries.
///
/// Implementations must return promptly. Anything slow belongs behind a
/// channel, see [`ChannelGateway`].
pub trait Gateway: Send {
    /// Schedule the "take a break" notification `delay_secs` from now.
    fn schedule_break_notification(&mut self, delay_secs: u64) -> Result<(), GatewayError>;

    /// Schedule the "back to work" notification `delay_secs` from now.
    fn schedule_work_notification(&mut self, delay_secs: u64) -> Result<(), GatewayError>;

    /// Cancel every pending scheduled notification.
    fn cancel_all_scheduled(&mut self) -> Result<(), GatewayError>;

    fn haptic_impact(&mut self, style: ImpactStyle);

    fn haptic_feedback(&mut self, kind: FeedbackKind);
}

/// Gateway that drops everything. Used by headless hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopGateway;

impl Gateway for NoopGateway {
    fn schedule_break_notification(&mut self, _delay_secs: u64) -> Result<(), GatewayError> {
        Ok(())
    }

    fn schedule_work_notification(&mut self, _delay_secs: u64) -> Result<(), GatewayError> {
        Ok(())
    }

    fn cancel_all_scheduled(&mut self) -> Result<(), GatewayError> {
        Ok(())
    }

    fn haptic_impact(&mut self, _style: ImpactStyle) {}

    fn haptic_feedback(&mut self, _kind: FeedbackKind) {}
}

/// One gateway call, as a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayRequest {
    Schedule {
        content: NotificationContent,
        delay_secs: u64,
    },
    CancelAll,
    Impact {
        style: ImpactStyle,
    },
    Feedback {
        kind: FeedbackKind,
    },
}

/// Gateway that forwards each call over an unbounded channel without waiting.
#[derive(Debug, Clone)]
pub struct ChannelGateway {
    tx: mpsc::UnboundedSender<GatewayRequest>,
}

impl ChannelGateway {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<GatewayRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, request: GatewayRequest) -> Result<(), GatewayError> {
        self.tx
            .send(request)
            .map_err(|_| GatewayError::Disconnected)
    }
}

impl Gateway for ChannelGateway {
    fn schedule_break_notification(&mut self, delay_secs: u64) -> Result<(), GatewayError> {
        self.send(GatewayRequest::Schedule {
            content: NotificationContent::for_kind(NotificationKind::Break),
            delay_secs,
        })
    }

    fn schedule_work_notification(&mut self, delay_secs: u64) -> Result<(), GatewayError> {
        self.send(GatewayRequest::Schedule {
            content: NotificationContent::for_kind(NotificationKind::Work),
            delay_secs,
        })
    }

    fn cancel_all_scheduled(&mut self) -> Result<(), GatewayError> {
        self.send(GatewayRequest::CancelAll)
    }

    fn haptic_impact(&mut self, style: ImpactStyle) {
        // Fire-and-forget: a closed channel just means nobody is listening.
        let _ = self.send(GatewayRequest::Impact { style });
    }

    fn haptic_feedback(&mut self, kind: FeedbackKind) {
        let _ = self.send(GatewayRequest::Feedback { kind });
    }
}

/// Platform side of a [`ChannelGateway`]: actually delivers requests.
pub trait NotificationSink: Send + 'static {
    /// Current notification permission. Schedule requests are skipped
    /// unless this is `Granted`.
    fn permission(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    fn deliver(&mut self, request: &GatewayRequest) -> Result<(), GatewayError>;
}

/// Drain `rx` into `sink` until every sender is dropped.
///
/// Delivery failures are logged and skipped; they never reach the timer.
pub fn spawn_dispatcher<S: NotificationSink>(
    mut rx: mpsc::UnboundedReceiver<GatewayRequest>,
    mut sink: S,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            if let Err(e) = dispatch_one(&mut sink, &request) {
                warn!(error = %e, ?request, "notification request dropped");
            }
        }
        debug!("notification dispatcher stopped");
    })
}

fn dispatch_one<S: NotificationSink>(
    sink: &mut S,
    request: &GatewayRequest,
) -> Result<(), GatewayError> {
    if matches!(request, GatewayRequest::Schedule { .. })
        && sink.permission() != PermissionStatus::Granted
    {
        return Err(GatewayError::PermissionDenied);
    }
    sink.deliver(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MemorySink {
        delivered: Arc<Mutex<Vec<GatewayRequest>>>,
        denied: bool,
    }

    impl NotificationSink for MemorySink {
        fn permission(&self) -> PermissionStatus {
            if self.denied {
                PermissionStatus::Denied
            } else {
                PermissionStatus::Granted
            }
        }

        fn deliver(&mut self, request: &GatewayRequest) -> Result<(), GatewayError> {
            self.delivered.lock().unwrap().push(request.clone());
            Ok(())
        }
    }

    #[test]
    fn channel_gateway_sends_requests_in_order() {
        let (mut gateway, mut rx) = ChannelGateway::new();
        gateway.haptic_impact(ImpactStyle::Medium);
        gateway.schedule_break_notification(3600).unwrap();
        gateway.cancel_all_scheduled().unwrap();

        assert_eq!(rx.try_recv().unwrap(), GatewayRequest::Impact { style: ImpactStyle::Medium });
        match rx.try_recv().unwrap() {
            GatewayRequest::Schedule { content, delay_secs } => {
                assert_eq!(content.kind, NotificationKind::Break);
                assert_eq!(delay_secs, 3600);
            }
            other => panic!("Expected Schedule, got {other:?}"),
        }
        assert_eq!(rx.try_recv().unwrap(), GatewayRequest::CancelAll);
    }

    #[test]
    fn channel_gateway_reports_disconnect() {
        let (mut gateway, rx) = ChannelGateway::new();
        drop(rx);
        assert_eq!(
            gateway.schedule_work_notification(60),
            Err(GatewayError::Disconnected)
        );
        // Haptics never fail.
        gateway.haptic_feedback(FeedbackKind::Success);
    }

    #[test]
    fn notification_content_matches_kind() {
        let work = NotificationContent::for_kind(NotificationKind::Work);
        assert_eq!(work.kind, NotificationKind::Work);
        assert!(work.title.contains("Back to work"));
    }

    #[tokio::test]
    async fn dispatcher_delivers_until_senders_drop() {
        let (mut gateway, rx) = ChannelGateway::new();
        let sink = MemorySink::default();
        let delivered = Arc::clone(&sink.delivered);
        let handle = spawn_dispatcher(rx, sink);

        gateway.schedule_break_notification(10).unwrap();
        gateway.haptic_impact(ImpactStyle::Light);
        drop(gateway);
        handle.await.unwrap();

        assert_eq!(delivered.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn dispatcher_skips_schedules_without_permission() {
        let (mut gateway, rx) = ChannelGateway::new();
        let sink = MemorySink {
            denied: true,
            ..MemorySink::default()
        };
        let delivered = Arc::clone(&sink.delivered);
        let handle = spawn_dispatcher(rx, sink);

        gateway.schedule_break_notification(10).unwrap();
        gateway.cancel_all_scheduled().unwrap();
        drop(gateway);
        handle.await.unwrap();

        assert_eq!(*delivered.lock().unwrap(), vec![GatewayRequest::CancelAll]);
    }
}
