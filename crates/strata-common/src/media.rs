//! Media query lists.
//!
//! [Media Queries Level 4](https://www.w3.org/TR/mediaqueries-4/)
//!
//! "A media query list is a comma-separated list of media queries. If any of
//! the media queries in a media query list is true, the media query list is
//! true; otherwise it is false."

use serde::{Deserialize, Serialize};

/// [§ 2.3 Media Types](https://www.w3.org/TR/mediaqueries-4/#media-types)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// "Matches all devices."
    #[default]
    All,
    /// "Matches all devices that aren't matched by print."
    Screen,
    /// "Matches printers, and devices intended to reproduce a printed display."
    Print,
}

/// [§ 4.4 orientation](https://www.w3.org/TR/mediaqueries-4/#orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// "The orientation media feature is portrait when the value of the
    /// height media feature is greater than or equal to the value of the
    /// width media feature."
    Portrait,
    /// "Otherwise orientation is landscape."
    Landscape,
}

/// A single media feature test.
///
/// [§ 4 Viewport/Page Dimensions Media Features](https://www.w3.org/TR/mediaqueries-4/#mf-dimensions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaFeature {
    /// `(min-width: <length>)`
    MinWidth(i32),
    /// `(max-width: <length>)`
    MaxWidth(i32),
    /// `(min-height: <length>)`
    MinHeight(i32),
    /// `(max-height: <length>)`
    MaxHeight(i32),
    /// `(orientation: portrait | landscape)`
    Orientation(Orientation),
}

impl MediaFeature {
    /// Evaluate the feature against the output device.
    #[must_use]
    pub fn matches(self, ctx: &MediaContext) -> bool {
        match self {
            Self::MinWidth(width) => ctx.width >= width,
            Self::MaxWidth(width) => ctx.width <= width,
            Self::MinHeight(height) => ctx.height >= height,
            Self::MaxHeight(height) => ctx.height <= height,
            Self::Orientation(orientation) => ctx.orientation() == orientation,
        }
    }
}

/// The output device a media query is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaContext {
    /// The device's media type.
    pub media: MediaType,
    /// Viewport width in device units.
    pub width: i32,
    /// Viewport height in device units.
    pub height: i32,
}

impl MediaContext {
    /// [§ 4.4 orientation](https://www.w3.org/TR/mediaqueries-4/#orientation)
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        if self.height >= self.width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

/// One query of a media query list: a media type AND-ed with features.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaQueryItem {
    /// The media type the query applies to.
    #[serde(default)]
    pub media_type: MediaType,
    /// Feature tests that must all hold.
    #[serde(default)]
    pub features: Vec<MediaFeature>,
}

impl MediaQueryItem {
    /// Evaluate the query against the output device.
    #[must_use]
    pub fn eval(&self, ctx: &MediaContext) -> bool {
        let type_matches = self.media_type == MediaType::All || self.media_type == ctx.media;
        type_matches && self.features.iter().all(|feature| feature.matches(ctx))
    }
}

/// A media query list, combined with OR semantics.
///
/// [§ 2.1 Combining Media Queries](https://www.w3.org/TR/mediaqueries-4/#mq-list)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaQueryList {
    items: Vec<MediaQueryItem>,
}

impl MediaQueryList {
    /// Create an empty list (which matches every device).
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a query to the list.
    pub fn add_media_query_item(&mut self, item: MediaQueryItem) {
        self.items.push(item);
    }

    /// The queries in source order.
    #[must_use]
    pub fn items(&self) -> &[MediaQueryItem] {
        &self.items
    }

    /// "An empty media query list evaluates to true."
    ///
    /// Otherwise the list is true as soon as one query is.
    #[must_use]
    pub fn eval(&self, ctx: &MediaContext) -> bool {
        self.items.is_empty() || self.items.iter().any(|item| item.eval(ctx))
    }
}

impl FromIterator<MediaQueryItem> for MediaQueryList {
    fn from_iter<I: IntoIterator<Item = MediaQueryItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
