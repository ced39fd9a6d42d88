//! RSS 2.0, Atom, sitemap and robots.txt documents.
//!
//! Builders take plain data so the HTTP layer can feed them rows straight
//! from the repositories.

use crate::types::Timestamp;

/// Site-wide metadata shared by every feed.
#[derive(Debug, Clone)]
pub struct SiteInfo {
    /// Absolute base URL without a trailing slash.
    pub base_url: String,
    pub title: String,
    pub description: String,
    pub language: String,
}

impl SiteInfo {
    pub fn project_url(&self, slug: &str) -> String {
        format!("{}/projects/{slug}", self.base_url)
    }

    pub fn page_url(&self, slug: &str) -> String {
        format!("{}/{slug}", self.base_url)
    }
}

/// One project as it appears in a feed.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub published: Timestamp,
    pub updated: Timestamp,
}

/// A sitemap `<url>` element.
#[derive(Debug, Clone)]
pub struct SitemapUrl {
    pub loc: String,
    pub last_modified: Option<Timestamp>,
}

/// Escape the five XML special characters.
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

pub fn rss(site: &SiteInfo, entries: &[FeedEntry], built_at: Timestamp) -> String {
    let items: String = entries
        .iter()
        .map(|entry| {
            let url = xml_escape(&site.project_url(&entry.slug));
            format!(
                "\n    <item>\n      <title>{title}</title>\n      <link>{url}</link>\n      <guid>{url}</guid>\n      <description>{summary}</description>\n      <pubDate>{published}</pubDate>\n    </item>",
                title = xml_escape(&entry.title),
                summary = xml_escape(&entry.summary),
                published = entry.published.to_rfc2822(),
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\">\n  <channel>\n    <title>{title}</title>\n    <link>{link}</link>\n    <description>{description}</description>\n    <language>{language}</language>\n    <lastBuildDate>{built}</lastBuildDate>{items}\n  </channel>\n</rss>\n",
        title = xml_escape(&site.title),
        link = xml_escape(&site.base_url),
        description = xml_escape(&site.description),
        language = xml_escape(&site.language),
        built = built_at.to_rfc2822(),
    )
}

/// Atom feed. The feed-level `<updated>` is the newest entry update, or
/// `fallback_updated` when there are no entries.
pub fn atom(site: &SiteInfo, entries: &[FeedEntry], fallback_updated: Timestamp) -> String {
    let updated = entries
        .iter()
        .map(|entry| entry.updated)
        .max()
        .unwrap_or(fallback_updated);

    let items: String = entries
        .iter()
        .map(|entry| {
            let url = xml_escape(&site.project_url(&entry.slug));
            format!(
                "\n  <entry>\n    <title>{title}</title>\n    <link href=\"{url}\"/>\n    <id>{url}</id>\n    <updated>{updated}</updated>\n    <summary>{summary}</summary>\n  </entry>",
                title = xml_escape(&entry.title),
                updated = entry.updated.to_rfc3339(),
                summary = xml_escape(&entry.summary),
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<feed xmlns=\"http://www.w3.org/2005/Atom\">\n  <title>{title}</title>\n  <link href=\"{link}\"/>\n  <updated>{updated}</updated>\n  <id>{link}/atom</id>{items}\n</feed>\n",
        title = xml_escape(&site.title),
        link = xml_escape(&site.base_url),
        updated = updated.to_rfc3339(),
    )
}

pub fn sitemap(urls: &[SitemapUrl]) -> String {
    let body: String = urls
        .iter()
        .map(|url| {
            let lastmod = url
                .last_modified
                .map(|ts| format!("<lastmod>{}</lastmod>", ts.to_rfc3339()))
                .unwrap_or_default();
            format!("\n  <url><loc>{}</loc>{lastmod}</url>", xml_escape(&url.loc))
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">{body}\n</urlset>\n"
    )
}

/// Crawlers may index everything except the admin and API surfaces.
pub fn robots_txt(site: &SiteInfo) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /admin\nDisallow: /api\n\nSitemap: {}/sitemap.xml\n",
        site.base_url
    )
}
