pub mod traits;
pub mod http;
pub mod rss_feed;
pub mod wordpress;

pub use traits::{HttpClient, HttpResponse, LatestPostSource};
pub use http::ReqwestHttpClient;
pub use wordpress::WordPressSource;
