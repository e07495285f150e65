//! Movie-domain types served to clients.
//!
//! [`Movie`] is the flat record the API returns; it is produced fresh per
//! request from the provider's payload and carries no identity beyond
//! [`MovieId`]. Catalog listing parameters live in [`CatalogQuery`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// MovieId
// ---------------------------------------------------------------------------

/// Provider-canonical movie identifier. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct MovieId(u64);

/// Largest integer a JSON client can represent exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl MovieId {
    /// Wrap a raw id, rejecting zero.
    pub fn new(raw: u64) -> Option<Self> {
        (raw > 0).then_some(Self(raw))
    }

    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Accept a JSON value only if it is a positive integral number.
    ///
    /// `42` and `42.0` are accepted; strings, booleans, `0`, negatives and
    /// fractional numbers are not.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let serde_json::Value::Number(n) = value else {
            return Err(Error::invalid_id());
        };
        if let Some(raw) = n.as_u64() {
            return Self::new(raw).ok_or_else(Error::invalid_id);
        }
        n.as_f64()
            .and_then(from_integral_f64)
            .ok_or_else(Error::invalid_id)
    }

    /// Parse a comma-separated id list, silently dropping invalid entries
    /// and repeats. Order of first appearance is kept.
    pub fn parse_list(csv: &str) -> Vec<Self> {
        let mut seen = HashSet::new();
        csv.split(',')
            .filter_map(|s| s.parse::<Self>().ok())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

fn from_integral_f64(value: f64) -> Option<MovieId> {
    if value.is_finite() && value.fract() == 0.0 && value > 0.0 && value <= MAX_SAFE_INTEGER {
        MovieId::new(value as u64)
    } else {
        None
    }
}

impl TryFrom<u64> for MovieId {
    type Error = Error;

    fn try_from(raw: u64) -> Result<Self> {
        Self::new(raw).ok_or_else(Error::invalid_id)
    }
}

impl From<MovieId> for u64 {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

impl FromStr for MovieId {
    type Err = Error;

    /// Parses decimal integers and integral numeric notations such as
    /// `"7.0"` or `"1e3"`; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(raw) = s.parse::<u64>() {
            return Self::new(raw).ok_or_else(Error::invalid_id);
        }
        s.parse::<f64>()
            .ok()
            .and_then(from_integral_f64)
            .ok_or_else(Error::invalid_id)
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Movie / MoviesPage
// ---------------------------------------------------------------------------

/// Maximum number of actors kept on a [`Movie`].
pub const MAX_ACTORS: usize = 5;

/// Flat movie record returned by every movie endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: Option<i32>,
    /// Vote average rounded to one decimal place.
    pub rating: Option<f64>,
    pub description: Option<String>,
    /// Up to [`MAX_ACTORS`] names, most popular first.
    pub actors: Vec<String>,
    /// Genre names in provider order.
    pub genres: Vec<String>,
    /// Relative poster path as returned by the provider; see [`poster_url`].
    pub poster_path: Option<String>,
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviesPage {
    pub data: Vec<Movie>,
    pub page: u32,
    pub total: u64,
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Field a discovery listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Title,
    Year,
    #[default]
    Rating,
}

impl SortField {
    /// The provider's discovery field for this sort key.
    pub fn provider_key(self) -> &'static str {
        match self {
            SortField::Title => "original_title",
            SortField::Year => "primary_release_date",
            SortField::Rating => "vote_average",
        }
    }

    /// Lenient parse used for query strings: unknown or missing values
    /// fall back to the default.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(SortField::Title),
            "year" => Ok(SortField::Year),
            "rating" => Ok(SortField::Rating),
            other => Err(Error::Validation(format!("unknown sort field '{other}'"))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(Error::Validation(format!("unknown sort order '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// CatalogQuery
// ---------------------------------------------------------------------------

/// Parameters for one catalog listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Trimmed, non-empty search text. `None` means ranked discovery.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: u32,
    pub sort: SortField,
    pub order: SortOrder,
}

impl CatalogQuery {
    pub fn new(search: Option<&str>, page: u32, sort: SortField, order: SortOrder) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        Self {
            search,
            page: page.max(1),
            sort,
            order,
        }
    }

    /// The provider's `sort_by` value, e.g. `vote_average.desc`.
    pub fn sort_by(&self) -> String {
        format!("{}.{}", self.sort.provider_key(), self.order.as_str())
    }
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self::new(None, 1, SortField::default(), SortOrder::default())
    }
}

// ---------------------------------------------------------------------------
// Poster URLs
// ---------------------------------------------------------------------------

/// Poster widths offered by the provider's image CDN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PosterSize {
    W92,
    W154,
    W185,
    #[default]
    W342,
    W500,
    W780,
}

impl PosterSize {
    pub fn as_str(self) -> &'static str {
        match self {
            PosterSize::W92 => "w92",
            PosterSize::W154 => "w154",
            PosterSize::W185 => "w185",
            PosterSize::W342 => "w342",
            PosterSize::W500 => "w500",
            PosterSize::W780 => "w780",
        }
    }
}

/// Build an absolute poster URL from a relative provider path.
///
/// Returns `None` when there is no path.
pub fn poster_url(image_base: &str, path: Option<&str>, size: PosterSize) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    Some(format!(
        "{}/{}{}",
        image_base.trim_end_matches('/'),
        size.as_str(),
        path
    ))
}
