use opml::{Outline, OPML};

use crate::domain::Site;
use crate::errors::{WatchError, WatchResult};
use crate::services::site_service::SiteService;
use crate::sources::wordpress::normalize_base;
use crate::storage::KeyValueStore;

pub struct ImportResult {
    pub added: Vec<Site>,
    pub invalid: Vec<(String, String)>, // (url, error_message)
    pub duplicates: Vec<String>,
}

/// A site address and optional display name found in an OPML document
#[derive(Debug, PartialEq, Eq)]
struct OutlineSite {
    url: String,
    name: Option<String>,
}

pub struct ImportExportService<'a, S: KeyValueStore> {
    sites: &'a SiteService<S>,
}

impl<'a, S: KeyValueStore> ImportExportService<'a, S> {
    pub fn new(sites: &'a SiteService<S>) -> Self {
        Self { sites }
    }

    /// Import sites from OPML content
    pub fn import_opml(&self, content: &str) -> WatchResult<ImportResult> {
        let opml = OPML::from_str(content).map_err(|e| WatchError::OpmlParse(e.to_string()))?;

        let mut result = ImportResult {
            added: Vec::new(),
            invalid: Vec::new(),
            duplicates: Vec::new(),
        };

        for OutlineSite { url, name } in extract_sites(&opml.body.outlines) {
            if self.sites.exists(&url)? {
                result.duplicates.push(url);
                continue;
            }

            match self.sites.add(&url, name) {
                Ok(site) => result.added.push(site),
                Err(WatchError::SiteAlreadyExists(url)) => result.duplicates.push(url),
                Err(e @ WatchError::InvalidUrl(_)) => result.invalid.push((url, e.to_string())),
                Err(e) => return Err(e),
            }
        }

        Ok(result)
    }

    /// Export sites to OPML format
    pub fn export_opml(&self) -> WatchResult<String> {
        let sites = self.sites.list()?;

        let mut opml = OPML::default();
        opml.head = Some(opml::Head {
            title: Some("wpwatch sites".to_string()),
            ..Default::default()
        });

        for site in sites {
            let outline = Outline {
                text: site.display_name().to_string(),
                r#type: Some("rss".to_string()),
                xml_url: Some(format!("{}/feed", normalize_base(&site.url))),
                html_url: Some(site.url.clone()),
                title: site.name.clone(),
                ..Default::default()
            };
            opml.body.outlines.push(outline);
        }

        opml.to_string()
            .map_err(|e| WatchError::OpmlParse(e.to_string()))
    }
}

/// Recursively collect sites from OPML outlines.
/// The site page is preferred; a feed URL is turned back into its site.
fn extract_sites(outlines: &[Outline]) -> Vec<OutlineSite> {
    let mut sites = Vec::new();

    for outline in outlines {
        let url = outline
            .html_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .map(str::to_string)
            .or_else(|| {
                outline
                    .xml_url
                    .as_deref()
                    .filter(|u| !u.trim().is_empty())
                    .map(site_from_feed_url)
            });

        if let Some(url) = url {
            let name = outline
                .title
                .clone()
                .or_else(|| Some(outline.text.clone()))
                .filter(|n| !n.trim().is_empty() && *n != url);
            sites.push(OutlineSite { url, name });
        }

        // Recursively process child outlines
        sites.extend(extract_sites(&outline.outlines));
    }

    sites
}

fn site_from_feed_url(feed_url: &str) -> String {
    let base = normalize_base(feed_url.trim());
    base.strip_suffix("/feed").unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StateStore};

    fn setup() -> SiteService<MemoryStore> {
        SiteService::new(StateStore::new(MemoryStore::new()))
    }

    const SAMPLE_OPML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<opml version="2.0">
  <head><title>Blogs</title></head>
  <body>
    <outline text="Blog A" type="rss" xmlUrl="https://a.example/feed/" htmlUrl="https://a.example"/>
    <outline text="Folder">
      <outline text="Blog B" type="rss" xmlUrl="https://b.example/feed"/>
      <outline text="Broken" type="rss" xmlUrl="gopher://c.example/feed"/>
    </outline>
    <outline text="Blog A again" type="rss" htmlUrl="https://a.example/"/>
  </body>
</opml>"#;

    #[test]
    fn test_export_empty() {
        let sites = setup();
        let opml = ImportExportService::new(&sites).export_opml().unwrap();

        assert!(opml.contains("wpwatch sites"));
        assert!(opml.contains("<opml"));
    }

    #[test]
    fn test_export_lists_sites_with_feed_urls() {
        let sites = setup();
        sites.add("https://a.example/", Some("Blog A".to_string())).unwrap();

        let opml = ImportExportService::new(&sites).export_opml().unwrap();

        assert!(opml.contains("Blog A"));
        assert!(opml.contains("https://a.example/feed"));
    }

    #[test]
    fn test_import_sorts_added_duplicates_and_invalid() {
        let sites = setup();
        let result = ImportExportService::new(&sites).import_opml(SAMPLE_OPML).unwrap();

        let added: Vec<&str> = result.added.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(added, ["https://a.example", "https://b.example"]);
        assert_eq!(result.added[0].name.as_deref(), Some("Blog A"));
        assert_eq!(result.duplicates, vec!["https://a.example/".to_string()]);
        assert_eq!(result.invalid.len(), 1);
        assert_eq!(result.invalid[0].0, "gopher://c.example");
    }

    #[test]
    fn test_import_rejects_garbage() {
        let sites = setup();
        let result = ImportExportService::new(&sites).import_opml("not opml");
        assert!(matches!(result, Err(WatchError::OpmlParse(_))));
    }

    #[test]
    fn test_site_from_feed_url() {
        assert_eq!(site_from_feed_url("https://a.example/feed/"), "https://a.example");
        assert_eq!(site_from_feed_url("https://a.example/blog/feed"), "https://a.example/blog");
        assert_eq!(site_from_feed_url("https://a.example/rss.xml"), "https://a.example/rss.xml");
    }

    #[test]
    fn test_round_trip_keeps_names() {
        let source = setup();
        source.add("https://a.example", Some("Blog A".to_string())).unwrap();
        source.add("https://b.example", None).unwrap();
        let opml = ImportExportService::new(&source).export_opml().unwrap();

        let target = setup();
        let result = ImportExportService::new(&target).import_opml(&opml).unwrap();

        assert_eq!(result.added.len(), 2);
        assert_eq!(result.added[0].name.as_deref(), Some("Blog A"));
        assert_eq!(result.added[1].name, None);
    }
}
