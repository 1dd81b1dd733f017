//! XML sitemap rendering.

use crate::types::Timestamp;

/// One `<url>` entry.
#[derive(Debug, Clone)]
pub struct SitemapEntry {
    /// Path relative to the site root, starting with `/`.
    pub path: String,
    pub lastmod: Option<Timestamp>,
    pub changefreq: &'static str,
    pub priority: f32,
}

impl SitemapEntry {
    pub fn new(path: impl Into<String>, changefreq: &'static str, priority: f32) -> Self {
        Self {
            path: path.into(),
            lastmod: None,
            changefreq,
            priority,
        }
    }

    pub fn with_lastmod(mut self, lastmod: Timestamp) -> Self {
        self.lastmod = Some(lastmod);
        self
    }
}

/// Static storefront pages always listed in the sitemap.
pub fn static_pages() -> Vec<SitemapEntry> {
    vec![
        SitemapEntry::new("/", "daily", 1.0),
        SitemapEntry::new("/menu", "daily", 0.9),
        SitemapEntry::new("/about", "monthly", 0.5),
        SitemapEntry::new("/contact", "monthly", 0.5),
        SitemapEntry::new("/donate", "monthly", 0.4),
    ]
}

/// Escape the five XML special characters.
pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a `urlset` document for `base_url` (without trailing slash).
pub fn render(base_url: &str, entries: &[SitemapEntry]) -> String {
    let base = base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&format!("{base}{}", entry.path))
        ));
        if let Some(lastmod) = entry.lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod.format("%Y-%m-%d")));
        }
        xml.push_str(&format!("    <changefreq>{}</changefreq>\n", entry.changefreq));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}
