use crate::domain::Notification;
use crate::errors::WatchResult;
use crate::notifiers::traits::Notifier;

/// Prints notifications on stdout
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn name(&self) -> &'static str {
        "console"
    }

    fn create(&self, notification: &Notification) -> WatchResult<()> {
        println!("[{}] {}", notification.id, notification.format());
        Ok(())
    }
}
