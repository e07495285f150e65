//! Provider payload to flat [`Movie`] conversion.
//!
//! Pure and total: every optional field has a default, nothing here can fail.

use std::cmp::Ordering;

use mq_core::{Movie, MAX_ACTORS};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::provider::{ProviderCastMember, ProviderMovieDetails};

/// Flatten a provider details payload into a [`Movie`].
pub fn normalize(raw: ProviderMovieDetails) -> Movie {
    let actors = top_actors(raw.credits.map(|c| c.cast).unwrap_or_default());

    let title = raw
        .title
        .filter(|t| !t.is_empty())
        .or(raw.original_title)
        .unwrap_or_default();

    Movie {
        id: raw.id,
        title,
        year: raw.release_date.as_deref().and_then(release_year),
        rating: raw.vote_average.and_then(round_rating),
        description: raw.overview,
        actors,
        genres: raw.genres.into_iter().map(|g| g.name).collect(),
        poster_path: raw.poster_path,
    }
}

/// Names of the most popular cast members, most popular first.
///
/// Missing popularity ranks as 0; ties keep provider order.
fn top_actors(mut cast: Vec<ProviderCastMember>) -> Vec<String> {
    // sort_by is stable.
    cast.sort_by(|a, b| {
        let (a, b) = (a.popularity.unwrap_or(0.0), b.popularity.unwrap_or(0.0));
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    });
    cast.into_iter()
        .take(MAX_ACTORS)
        .map(|member| member.name)
        .collect()
}

/// Year from the first four characters of a date such as `"2001-06-01"`.
fn release_year(date: &str) -> Option<i32> {
    if date.is_empty() {
        return None;
    }
    let prefix: String = date.chars().take(4).collect();
    prefix.trim().parse().ok()
}

/// One decimal place, rounding the exact binary value of the float.
///
/// `6.35` is stored as `6.3499...` and becomes `6.3`; only exact ties such
/// as `7.25` round away from zero.
fn round_rating(value: f64) -> Option<f64> {
    Decimal::from_f64_retain(value)?
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
}
