//! # Tracked celestial bodies
//!
//! The seven naked-eye bodies followed by the application, with their static identity:
//! localized display name, URL/lookup slug, list-filter category and icon reference.
//!
//! Slugs are produced by [`slugify`] from the localized names, so both the English
//! (`"mercury"`) and Portuguese (`"mercurio"`) spellings resolve through [`Body::from_slug`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::sky_errors::SkyError;

/// Display language for body names and visibility captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "pt-BR")]
    PortugueseBr,
}

impl FromStr for Locale {
    type Err = SkyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Locale::English),
            "pt" | "pt-br" | "portuguese" => Ok(Locale::PortugueseBr),
            _ => Err(SkyError::UnknownLocale(s.to_string())),
        }
    }
}

/// Category used by the list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Star,
    Satellite,
    Planet,
}

impl BodyKind {
    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (BodyKind::Star, Locale::English) => "Star",
            (BodyKind::Satellite, Locale::English) => "Satellite",
            (BodyKind::Planet, Locale::English) => "Planet",
            (BodyKind::Star, Locale::PortugueseBr) => "Estrela",
            (BodyKind::Satellite, Locale::PortugueseBr) => "Satélite",
            (BodyKind::Planet, Locale::PortugueseBr) => "Planeta",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
}

impl Body {
    /// Every body, in declaration order.
    pub const ALL: [Body; 7] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
    ];

    /// Evaluation order of the visibility list: planets outward, then Moon and Sun.
    pub const TRACKED: [Body; 7] = [
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Moon,
        Body::Sun,
    ];

    pub fn name(&self) -> &'static str {
        self.display_name(Locale::English)
    }

    pub fn display_name(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::English => match self {
                Body::Sun => "Sun",
                Body::Moon => "Moon",
                Body::Mercury => "Mercury",
                Body::Venus => "Venus",
                Body::Mars => "Mars",
                Body::Jupiter => "Jupiter",
                Body::Saturn => "Saturn",
            },
            Locale::PortugueseBr => match self {
                Body::Sun => "Sol",
                Body::Moon => "Lua",
                Body::Mercury => "Mercúrio",
                Body::Venus => "Vênus",
                Body::Mars => "Marte",
                Body::Jupiter => "Júpiter",
                Body::Saturn => "Saturno",
            },
        }
    }

    /// Canonical (English) slug, e.g. `"jupiter"`.
    pub fn slug(&self) -> String {
        slugify(self.name())
    }

    pub fn kind(&self) -> BodyKind {
        match self {
            Body::Sun => BodyKind::Star,
            Body::Moon => BodyKind::Satellite,
            _ => BodyKind::Planet,
        }
    }

    /// Relative path of the sprite used by list cards and sky markers.
    pub fn icon(&self) -> String {
        format!("images/{}.png", self.slug())
    }

    /// Sun and Moon are findable in daylight and are exempt from the dark-sky rules.
    pub fn is_luminary(&self) -> bool {
        matches!(self, Body::Sun | Body::Moon)
    }

    /// Resolve a slug in any supported locale (`"saturno"`, `"saturn"`, `"Saturno"`).
    pub fn from_slug(slug: &str) -> Result<Body, SkyError> {
        let wanted = slugify(slug);
        Body::ALL
            .into_iter()
            .find(|body| {
                [Locale::English, Locale::PortugueseBr]
                    .iter()
                    .any(|&locale| slugify(body.display_name(locale)) == wanted)
            })
            .ok_or_else(|| SkyError::UnknownBody(slug.to_string()))
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = SkyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Body::from_slug(s)
    }
}

fn strip_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => c,
    }
}

/// Lowercase, accent-free, dash-separated form of a name.
///
/// Runs of non-alphanumeric characters become a single `-`; leading and trailing
/// dashes are dropped. `"Vênus"` → `"venus"`, `"  Júpiter II "` → `"jupiter-ii"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase).map(strip_accent) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}
