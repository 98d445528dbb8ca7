pub mod traits;
pub mod console;
pub mod webhook;
pub mod browser;

pub use traits::{LinkOpener, Notifier};
pub use console::ConsoleNotifier;
pub use webhook::WebhookNotifier;
pub use browser::BrowserOpener;
