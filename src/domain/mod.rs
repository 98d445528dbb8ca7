pub mod site;
pub mod item;
pub mod notification;
pub mod check_result;

pub use site::Site;
pub use item::{FetchedItem, LastSeen, LastSeenMap};
pub use notification::Notification;
pub use check_result::CheckResult;
