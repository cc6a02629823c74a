//! Built-in site profiles
//!
//! A profile bundles how a site lays out its listing pages with the extraction
//! rules for its detail pages.

use crate::extract::rules::{CompositeRule, DetailRules, FieldRule, LinkRule, PageCountRule};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// How listing page URLs are built for a site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingMode {
    /// `{base}/page/{n}`
    Paged,
    /// `{base}/{tag}?start={offset}&type=T`
    Tag,
}

/// Supported sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    /// Server-rendered movie catalog
    Movies,
    /// Tag-sorted book listings
    Books,
}

impl Profile {
    pub fn listing_mode(&self) -> ListingMode {
        match self {
            Self::Movies => ListingMode::Paged,
            Self::Books => ListingMode::Tag,
        }
    }

    /// Field used to name persisted records
    pub fn name_field(&self) -> &'static str {
        match self {
            Self::Movies => "name",
            Self::Books => "title",
        }
    }

    /// Items per listing page, used to compute tag listing offsets
    pub fn default_page_size(&self) -> u32 {
        match self {
            Self::Movies => 10,
            Self::Books => 20,
        }
    }

    /// Whether the total page count can be read off the first listing page
    pub fn discovers_page_count(&self) -> bool {
        self.page_count_pattern().is_some()
    }

    fn link_pattern(&self) -> &'static str {
        match self {
            Self::Movies => r#"<a.*?href="(.*?)".*?class="name">"#,
            Self::Books => r#"(?s)<h2.*?class.*?href="(.*?)""#,
        }
    }

    fn page_count_pattern(&self) -> Option<&'static str> {
        match self {
            Self::Movies => None,
            Self::Books => Some(r#"<a[^>]*>([^<]*)</a>\s*<span[^>]*class="next""#),
        }
    }

    /// Builds the detail-link rule, resolving hrefs against `base_url`
    pub fn link_rule(&self, base_url: Url) -> Result<LinkRule, regex::Error> {
        LinkRule::new(self.link_pattern(), base_url)
    }

    pub fn page_count_rule(&self) -> Result<Option<PageCountRule>, regex::Error> {
        self.page_count_pattern().map(PageCountRule::new).transpose()
    }

    /// Builds the detail-page rules
    pub fn detail_rules(&self) -> Result<DetailRules, regex::Error> {
        match self {
            Self::Movies => Ok(DetailRules::new(
                vec![
                    FieldRule::single(
                        "cover",
                        r#"(?s)class="item.*?<img.*?src="(.*?)".*?class="cover">"#,
                    )?,
                    FieldRule::single("name", r"(?s)<h2.*?>(.*?)</h2>")?,
                    FieldRule::list(
                        "categories",
                        r"(?s)<button.*?category.*?<span>(.*?)</span>.*?</button>",
                    )?,
                    FieldRule::single("published_at", r"(\d{4}-\d{2}-\d{2})\s?上映")?,
                    FieldRule::single("drama", r"(?s)<div.*?drama.*?>.*?<p.*?>(.*?)</p>")?,
                    FieldRule::single("score", r"(?s)<p.*?score.*?>(.*?)</p>")?,
                ],
                self.name_field(),
            )),
            Self::Books => Ok(DetailRules::new(
                vec![
                    FieldRule::single("title", r"<h1>\s*<span.*?>(.*?)</span>")?,
                    FieldRule::single("cover", r#"(?s)<a\s*class="nbg"\s*href="(.*?)".*?>"#)?,
                    FieldRule::single("author", r"(?s)<span.*?> 作者</span>.*?<a.*?>(.*?)</a>")?,
                    FieldRule::single(
                        "publisher",
                        r"(?s)<span.*?出版社.*?<a.*?>(.*?)</a>.*?</span>",
                    )?,
                    FieldRule::single("publisher_year", r"(?s)<span.*?出版年.*?</span>(.*?)<br/>")?,
                    FieldRule::single("pages", r"(?s)<span.*?页数.*?</span>(.*?)<br/>")?,
                    FieldRule::single("isbn", r"(?s)<span.*?>ISBN:</span>(.*?)<br/>")?,
                    FieldRule::single("price", r"(?s)<span.*?定价.*?</span>(.*?)<br/>")?,
                    FieldRule::single(
                        "drama",
                        r#"(?s)<div\s*class="intro">.*?<p>(.*?)</p></div>"#,
                    )?,
                    FieldRule::single("score", r"<strong.*?rating_num.*?>(.*?)</strong>")?,
                ],
                self.name_field(),
            )
            .with_composite(CompositeRule {
                primary: "title".to_string(),
                secondary: FieldRule::single("sub_title", r"(?s)<span.*?副标题:</span>(.*?)<br/>")?,
                separator: ":".to_string(),
            })),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movies => write!(f, "movies"),
            Self::Books => write!(f, "books"),
        }
    }
}
