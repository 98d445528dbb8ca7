use rss::Channel;
use tracing::debug;

use crate::domain::FetchedItem;
use crate::errors::WatchResult;

/// Parse an RSS document and map its first `item`.
/// Returns `Ok(None)` for well-formed XML without items, including documents
/// whose root is not an RSS channel (e.g. Atom).
pub fn first_item(bytes: &[u8]) -> WatchResult<Option<FetchedItem>> {
    let channel = match Channel::read_from(bytes) {
        Ok(channel) => channel,
        Err(rss::Error::InvalidStartTag) => {
            debug!("feed document has no RSS channel");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let Some(item) = channel.items().first() else {
        return Ok(None);
    };

    let title = item.title().unwrap_or_default().to_string();
    let link = item.link().unwrap_or_default().to_string();

    // guid -> link -> title
    let id = non_empty(item.guid().map(|g| g.value()))
        .or_else(|| non_empty(item.link()))
        .or_else(|| non_empty(item.title()))
        .map(str::to_string);

    let date = non_empty(item.pub_date()).map(str::to_string);

    Ok(Some(
        FetchedItem::new(title, link).with_id(id).with_date(date),
    ))
}

/// Blank values count as missing; others are kept as written
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::WatchError;

    // Sample WordPress feed (trimmed)
    const SAMPLE_RSS: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Example Blog</title>
    <link>https://blog.example.com</link>
    <description>Just another WordPress site</description>
    <item>
      <title>Hello world!</title>
      <link>https://blog.example.com/hello-world/</link>
      <pubDate>Mon, 15 Jan 2024 10:00:00 +0000</pubDate>
      <guid isPermaLink="false">https://blog.example.com/?p=42</guid>
    </item>
    <item>
      <title>Older post</title>
      <link>https://blog.example.com/older/</link>
      <guid isPermaLink="false">https://blog.example.com/?p=41</guid>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_first_item_fields() {
        let item = first_item(SAMPLE_RSS).unwrap().unwrap();

        assert_eq!(item.title, "Hello world!");
        assert_eq!(item.link, "https://blog.example.com/hello-world/");
        assert_eq!(item.id.as_deref(), Some("https://blog.example.com/?p=42"));
        assert_eq!(item.date.as_deref(), Some("Mon, 15 Jan 2024 10:00:00 +0000"));
    }

    #[test]
    fn test_missing_guid_falls_back_to_link() {
        let xml = br#"<rss version="2.0"><channel><title>t</title><link>l</link><description>d</description>
<item><title>No guid</title><link>https://a.example/no-guid</link></item>
</channel></rss>"#;

        let item = first_item(xml).unwrap().unwrap();
        assert_eq!(item.id.as_deref(), Some("https://a.example/no-guid"));
        assert_eq!(item.date, None);
    }

    #[test]
    fn test_missing_guid_and_link_falls_back_to_title() {
        let xml = br#"<rss version="2.0"><channel><title>t</title><link>l</link><description>d</description>
<item><title>Only a title</title></item>
</channel></rss>"#;

        let item = first_item(xml).unwrap().unwrap();
        assert_eq!(item.id.as_deref(), Some("Only a title"));
        assert_eq!(item.link, "");
    }

    #[test]
    fn test_feed_without_items() {
        let xml = br#"<rss version="2.0"><channel><title>t</title><link>l</link><description>d</description></channel></rss>"#;
        assert!(first_item(xml).unwrap().is_none());
    }

    #[test]
    fn test_malformed_feed_is_parse_error() {
        let result = first_item(b"<rss version=\"2.0\"><channel><title>unclosed");
        assert!(matches!(result, Err(WatchError::FeedParse(_))));
    }

    #[test]
    fn test_atom_document_has_no_item() {
        let xml = br#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example Blog</title>
  <entry>
    <title>Hello</title>
    <link href="https://blog.example.com/hello/"/>
    <id>tag:blog.example.com,2024:1</id>
  </entry>
</feed>"#;

        assert!(first_item(xml).unwrap().is_none());
    }

    #[test]
    fn test_html_page_has_no_item() {
        assert!(first_item(b"<html><body>not a feed</body></html>").unwrap().is_none());
    }

    #[test]
    fn test_non_empty_keeps_raw_value() {
        assert_eq!(non_empty(Some(" https://a.example/x ")), Some(" https://a.example/x "));
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_blank_guid_is_skipped() {
        let xml = br#"<rss version="2.0"><channel><title>t</title><link>l</link><description>d</description>
<item><title>Blank guid</title><link>https://a.example/blank</link><guid>   </guid></item>
</channel></rss>"#;

        let item = first_item(xml).unwrap().unwrap();
        assert_eq!(item.id.as_deref(), Some("https://a.example/blank"));
    }
}
