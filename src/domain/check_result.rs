use serde::Serialize;

use super::FetchedItem;

/// Outcome of checking one site during a batch
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub site: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<FetchedItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub is_new: bool,
}

impl CheckResult {
    pub fn success(site: &str, latest: FetchedItem, is_new: bool) -> Self {
        Self {
            site: site.to_string(),
            ok: true,
            latest: Some(latest),
            error: None,
            is_new,
        }
    }

    pub fn failure(site: &str, error: String) -> Self {
        Self {
            site: site.to_string(),
            ok: false,
            latest: None,
            error: Some(error),
            is_new: false,
        }
    }
}
