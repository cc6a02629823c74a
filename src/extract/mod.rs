//! Extraction module for turning listing and detail markup into data
//!
//! This module contains:
//! - The [`Record`] type produced for every detail page
//! - Pattern rules for detail links, page counts and record fields
//! - The built-in site profiles that enumerate those rules

mod profiles;
mod record;
mod rules;

pub use profiles::{ListingMode, Profile};
pub use record::{FieldValue, Record};
pub use rules::{CompositeRule, DetailRules, FieldKind, FieldRule, LinkRule, PageCountRule};

use url::Url;

/// An absolute URL to a detail page
pub type DetailLink = Url;

/// All compiled rules for one site
#[derive(Debug, Clone)]
pub struct SiteRules {
    pub links: LinkRule,
    pub page_count: Option<PageCountRule>,
    pub detail: DetailRules,
}

impl SiteRules {
    /// Compiles the rules of `profile`, resolving links against `base_url`
    pub fn for_profile(profile: Profile, base_url: Url) -> Result<Self, regex::Error> {
        Ok(Self {
            links: profile.link_rule(base_url)?,
            page_count: profile.page_count_rule()?,
            detail: profile.detail_rules()?,
        })
    }
}
