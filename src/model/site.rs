use serde::Deserialize;

/// Separator between the site name and the page part of the document title.
pub const TITLE_SEPARATOR: &str = " ·:· ";

/// Identity of the site, used to derive document titles.
///
/// Built once at startup (see [`SiteConfig`](crate::config::SiteConfig)) and only read
/// afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteIdentity {
    pub name: String,
    pub slogan: String,
}

impl Default for SiteIdentity {
    fn default() -> Self {
        Self {
            name: "Blog IRS".to_string(),
            slogan: "Talento, a gente já tem!".to_string(),
        }
    }
}

impl SiteIdentity {
    pub fn new(name: impl Into<String>, slogan: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slogan: slogan.into(),
        }
    }

    /// Document title for a page.
    ///
    /// Without a page title (or with an empty one) the slogan takes its place.
    pub fn title(&self, page_title: Option<&str>) -> String {
        let suffix = match page_title {
            Some(title) if !title.is_empty() => title,
            _ => self.slogan.as_str(),
        };
        format!("{}{}{}", self.name, TITLE_SEPARATOR, suffix)
    }
}
