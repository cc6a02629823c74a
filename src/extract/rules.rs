//! Pattern-based extraction rules
//!
//! Each rule is a regular expression whose first capture group holds the value
//! of interest. Rules never fail on malformed markup: a rule that does not match
//! simply yields no value.

use crate::extract::record::{FieldValue, Record};
use regex::Regex;
use url::Url;

/// How many matches a field rule keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// First match only; no match gives null
    Single,
    /// All matches in document order; no match gives an empty list
    List,
}

/// A named pattern that pulls one value or a set of values out of a document
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: String,
    pub pattern: Regex,
    pub kind: FieldKind,
}

impl FieldRule {
    /// Creates a rule keeping the first match
    pub fn single(name: &str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.to_string(),
            pattern: Regex::new(pattern)?,
            kind: FieldKind::Single,
        })
    }

    /// Creates a rule keeping every match
    pub fn list(name: &str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.to_string(),
            pattern: Regex::new(pattern)?,
            kind: FieldKind::List,
        })
    }

    /// Applies the rule to a document
    pub fn apply(&self, body: &str) -> FieldValue {
        match self.kind {
            FieldKind::Single => FieldValue::Single(first_capture(&self.pattern, body)),
            FieldKind::List => FieldValue::List(
                self.pattern
                    .captures_iter(body)
                    .filter_map(|caps| caps.get(1))
                    .map(|m| m.as_str().trim().to_string())
                    .collect(),
            ),
        }
    }
}

/// A field built by joining a primary field with an auxiliary one
///
/// The auxiliary rule's value is only used for the join and is not stored in the
/// record on its own.
#[derive(Debug, Clone)]
pub struct CompositeRule {
    /// Name of the field that receives the joined value
    pub primary: String,
    /// Rule for the value appended after the separator
    pub secondary: FieldRule,
    pub separator: String,
}

impl CompositeRule {
    /// Joins `primary` and `secondary` when both are present and the secondary is non-empty
    pub fn combine(&self, primary: Option<String>, secondary: Option<&str>) -> Option<String> {
        match (primary, secondary) {
            (Some(primary), Some(secondary)) if !secondary.is_empty() => {
                Some(format!("{}{}{}", primary, self.separator, secondary))
            }
            (primary, _) => primary,
        }
    }
}

/// The complete rule set for a detail page
#[derive(Debug, Clone)]
pub struct DetailRules {
    fields: Vec<FieldRule>,
    composite: Option<CompositeRule>,
    name_field: String,
}

impl DetailRules {
    pub fn new(fields: Vec<FieldRule>, name_field: &str) -> Self {
        Self {
            fields,
            composite: None,
            name_field: name_field.to_string(),
        }
    }

    pub fn with_composite(mut self, composite: CompositeRule) -> Self {
        self.composite = Some(composite);
        self
    }

    /// Name of the field used to name persisted records
    pub fn name_field(&self) -> &str {
        &self.name_field
    }

    /// Names of the fields every extracted record carries, in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|rule| rule.name.as_str())
    }

    /// Applies every rule independently to the same document
    ///
    /// The returned record always holds one entry per rule, whatever the markup
    /// looks like.
    pub fn extract_record(&self, body: &str) -> Record {
        let mut record = Record::new();
        for rule in &self.fields {
            record.insert(rule.name.clone(), rule.apply(body));
        }

        if let Some(composite) = &self.composite {
            let secondary = composite.secondary.apply(body);
            let primary = record.text(&composite.primary).map(str::to_string);
            let combined = composite.combine(primary, secondary.as_text());
            record.insert(composite.primary.clone(), FieldValue::Single(combined));
        }

        record
    }
}

/// Locates detail-page links on a listing page
#[derive(Debug, Clone)]
pub struct LinkRule {
    pattern: Regex,
    base_url: Url,
}

impl LinkRule {
    pub fn new(pattern: &str, base_url: Url) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            base_url,
        })
    }

    /// Returns every detail link in document order, resolved against the base URL
    ///
    /// A page without matching anchors yields an empty list.
    pub fn extract_links(&self, body: &str) -> Vec<Url> {
        let mut links = Vec::new();
        for caps in self.pattern.captures_iter(body) {
            let Some(href) = caps.get(1).map(|m| m.as_str().trim()) else {
                continue;
            };
            match self.base_url.join(href) {
                Ok(link) => {
                    tracing::info!("get detail url {}", link);
                    links.push(link);
                }
                Err(e) => tracing::error!("Skipping unresolvable href {:?}: {}", href, e),
            }
        }
        links
    }
}

/// Reads the total page count from a listing page's pagination control
#[derive(Debug, Clone)]
pub struct PageCountRule {
    pattern: Regex,
}

impl PageCountRule {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Returns the label of the page link right before the "next page" marker
    ///
    /// Returns `None` when there is no such marker, or when the label is not a
    /// positive number.
    pub fn discover_page_count(&self, body: &str) -> Option<u32> {
        let label = first_capture(&self.pattern, body)?;
        match label.parse::<u32>() {
            Ok(0) => None,
            Ok(count) => Some(count),
            Err(_) => {
                tracing::warn!("Pagination label {:?} is not a page number", label);
                None
            }
        }
    }
}

fn first_capture(pattern: &Regex, body: &str) -> Option<String> {
    pattern
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}
