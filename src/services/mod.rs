pub mod batch_runner;
pub mod import_export_service;
pub mod notification_service;
pub mod scheduler;
pub mod site_service;

pub use batch_runner::BatchRunner;
pub use import_export_service::{ImportExportService, ImportResult};
pub use notification_service::NotificationService;
pub use scheduler::{spawn_scheduler, spawn_settings_watcher, Scheduler, SchedulerHandle};
pub use site_service::SiteService;
