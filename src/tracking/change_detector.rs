use crate::domain::{FetchedItem, LastSeen};

/// Decide whether `latest` has not been notified yet.
///
/// A site without a previous record always reports its current post as new.
/// Items carrying a post id are compared by id, everything else by link.
pub fn is_new(latest: &FetchedItem, last: Option<&LastSeen>) -> bool {
    let Some(last) = last else {
        return true;
    };

    match &latest.id {
        Some(id) => last.post_id.as_deref() != Some(id.as_str()),
        None => latest.link_opt() != last.link.as_deref().filter(|l| !l.is_empty()),
    }
}
