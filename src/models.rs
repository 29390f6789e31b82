//! Data models shared by the scrape pipeline, the outputs, and the UI.
//!
//! - [`SiteDescriptor`]: one entry of the site registry
//! - [`ExtractedHeadline`]: raw text/link pair pulled out of a listing page
//! - [`Headline`]: a classified headline annotated with its source
//! - [`ImportanceTier`]: the three importance levels and their presentation
//! - [`Digest`]: the JSON envelope for one scrape cycle

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where to look for a headline's link element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkScope {
    /// Search inside the headline element, then inside its parent.
    #[default]
    SelfThenParent,
    /// Search inside the headline element only.
    SelfOnly,
}

/// Static configuration for one news site.
///
/// `class_name` and `link_class` are space-separated class token sets. An
/// element matches when its `class` attribute carries every token; an empty
/// set matches any element of the tag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SiteDescriptor {
    /// Display name, e.g. "BBC".
    pub name: String,
    /// Listing page to fetch.
    pub url: String,
    /// Tag name of headline elements.
    pub tag: String,
    /// Class tokens required on headline elements.
    #[serde(default)]
    pub class_name: String,
    /// Tag name of link elements.
    pub link_tag: String,
    /// Class tokens required on link elements.
    #[serde(default)]
    pub link_class: String,
    /// Prefix for relative links.
    pub base_url: String,
    /// Homepage opened from the UI.
    pub site_url: String,
    #[serde(default)]
    pub link_scope: LinkScope,
}

impl SiteDescriptor {
    /// Selector view of this descriptor, as consumed by the extractor.
    pub fn selectors(&self) -> Selectors<'_> {
        Selectors {
            tag: &self.tag,
            class_name: &self.class_name,
            link_tag: &self.link_tag,
            link_class: &self.link_class,
            link_scope: self.link_scope,
        }
    }
}

/// Borrowed selector set for the extractor.
#[derive(Debug, Clone, Copy)]
pub struct Selectors<'a> {
    pub tag: &'a str,
    pub class_name: &'a str,
    pub link_tag: &'a str,
    pub link_class: &'a str,
    pub link_scope: LinkScope,
}

/// A headline as found on a listing page, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedHeadline {
    pub text: String,
    /// Absolute URL, or empty when no link was found.
    pub link: String,
}

/// Importance level assigned by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ImportanceTier {
    High,
    Medium,
    Low,
}

impl ImportanceTier {
    /// Display order, most important first.
    pub const ALL: [ImportanceTier; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::High => "🔴",
            Self::Medium => "🟡",
            Self::Low => "🟢",
        }
    }

    /// Accent color as `#RRGGBB`.
    pub fn color_code(self) -> &'static str {
        match self {
            Self::High => "#DC2626",
            Self::Medium => "#CA8A04",
            Self::Low => "#16A34A",
        }
    }

    /// Background fill of the spreadsheet importance cell.
    pub fn cell_fill(self) -> u32 {
        match self {
            Self::High => 0xFFF4F4,
            Self::Medium => 0xFFFAE5,
            Self::Low => 0xEDF8F2,
        }
    }

    /// Font color of the spreadsheet importance cell.
    pub fn cell_font(self) -> u32 {
        match self {
            Self::High => 0x9C1C1C,
            Self::Medium => 0x7F6B00,
            Self::Low => 0x166530,
        }
    }

    /// [`color_code`](Self::color_code) as RGB components.
    pub fn rgb(self) -> (u8, u8, u8) {
        let hex = u32::from_str_radix(&self.color_code()[1..], 16).unwrap_or(0);
        ((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

impl fmt::Display for ImportanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified headline from one site.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Headline {
    /// Name of the site it came from.
    pub source: String,
    pub text: String,
    /// Absolute URL of the story, or empty.
    pub link: String,
    pub importance: ImportanceTier,
    /// Glyph of `importance`, kept alongside for export.
    pub emoji: String,
    /// Homepage of the source site.
    pub site_url: String,
}

impl Headline {
    pub fn new(site: &SiteDescriptor, extracted: ExtractedHeadline, importance: ImportanceTier) -> Self {
        Self {
            source: site.name.clone(),
            text: extracted.text,
            link: extracted.link,
            importance,
            emoji: importance.glyph().to_string(),
            site_url: site.site_url.clone(),
        }
    }
}

/// All headlines of one scrape cycle, as written to JSON.
#[derive(Debug, Deserialize, Serialize)]
pub struct Digest {
    /// Local date in `YYYY-MM-DD` format.
    pub local_date: String,
    /// Local time in `HH:MM:SS` format.
    pub local_time: String,
    pub total: usize,
    pub headlines: Vec<Headline>,
}
