//! Best-effort delivery of threshold notifications.

use anyhow::Result;
use tracing::warn;

use super::tracker::Notification;

/// OS notification primitive
///
/// Implementations should return quickly (spawn, don't wait). Errors are
/// logged by [`dispatch`] and never retried.
pub trait Notifier: Send + Sync {
    /// Attempt to show a notification
    fn notify(&self, title: &str, body: &str) -> Result<()>;
}

/// Hand every notification to `notifier`, swallowing delivery failures
pub fn dispatch<N: Notifier + ?Sized>(notifier: &N, notifications: &[Notification]) {
    for n in notifications {
        if let Err(e) = notifier.notify(&n.title, &n.body) {
            warn!(key = %n.key, error = %e, "Failed to deliver notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct FailingNotifier {
        attempts: Mutex<Vec<String>>,
    }

    impl Notifier for FailingNotifier {
        fn notify(&self, title: &str, _body: &str) -> Result<()> {
            self.attempts.lock().push(title.to_string());
            anyhow::bail!("notification center unavailable")
        }
    }

    #[test]
    fn test_dispatch_swallows_failures() {
        let notifier = FailingNotifier {
            attempts: Mutex::new(Vec::new()),
        };
        let notifications = vec![
            Notification {
                key: "Claude_session".to_string(),
                title: "Claude session at 81%".to_string(),
                body: "Resets in 1h 0m".to_string(),
            },
            Notification {
                key: "Claude_weekly_all".to_string(),
                title: "Claude weekly at 90%".to_string(),
                body: "Resets in 40h 0m".to_string(),
            },
        ];

        dispatch(&notifier, &notifications);

        // Every notification is attempted even after a failure
        assert_eq!(notifier.attempts.lock().len(), 2);
    }
}
