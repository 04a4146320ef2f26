//! Search, flag filter and sort over any record that exposes its fields.
//!
//! Each stage borrows its input and returns a fresh `Vec`, so the source
//! list is never reordered or mutated by a view over it.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(i64),
    Flag(bool),
    /// A date column where `None` means "no deadline".
    Deadline(Option<&'a str>),
    Missing,
}

pub trait Fields {
    type Field: Copy;

    fn field(&self, field: Self::Field) -> FieldValue<'_>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

pub fn filter_by_search<T: Fields + Clone>(
    items: &[T],
    query: Option<&str>,
    fields: &[T::Field],
) -> Vec<T> {
    let query = match query {
        Some(query) if !query.is_empty() => query.to_lowercase(),
        _ => return items.to_vec(),
    };

    items
        .iter()
        .filter(|item| {
            fields.iter().any(|&field| match item.field(field) {
                FieldValue::Text(value) => value.to_lowercase().contains(&query),
                _ => false,
            })
        })
        .cloned()
        .collect()
}

/// Keeps the items whose boolean `field` equals `flag`. Non-boolean values
/// never match.
pub fn filter_by_flag<T: Fields + Clone>(items: &[T], field: T::Field, flag: bool) -> Vec<T> {
    items
        .iter()
        .filter(|item| item.field(field) == FieldValue::Flag(flag))
        .cloned()
        .collect()
}

pub fn sort_by<T: Fields + Clone>(items: &[T], field: T::Field, order: SortOrder) -> Vec<T> {
    let mut sorted = items.to_vec();
    // slice::sort_by is stable
    sorted.sort_by(|a, b| compare(a.field(field), b.field(field), order));
    sorted
}

/// Values of a different kind never compare equal: concrete values come
/// first, then deadlines that do not parse, then missing values. That
/// placement holds in both directions; only the order within a kind follows
/// `order`.
fn compare(a: FieldValue<'_>, b: FieldValue<'_>, order: SortOrder) -> Ordering {
    let (a_rank, b_rank) = (rank(a), rank(b));
    if a_rank != b_rank {
        return a_rank.cmp(&b_rank);
    }

    let ordering = match (a, b) {
        (FieldValue::Number(a), FieldValue::Number(b)) => a.cmp(&b),
        (FieldValue::Flag(a), FieldValue::Flag(b)) => a.cmp(&b),
        (FieldValue::Text(a), FieldValue::Text(b)) => locale_compare(a, b),
        (FieldValue::Deadline(Some(a)), FieldValue::Deadline(Some(b))) => {
            match (parse_date(a), parse_date(b)) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        _ => Ordering::Equal,
    };
    order.apply(ordering)
}

fn rank(value: FieldValue<'_>) -> u8 {
    match value {
        FieldValue::Number(_) => 0,
        FieldValue::Flag(_) => 1,
        FieldValue::Text(_) => 2,
        FieldValue::Deadline(Some(deadline)) if parse_date(deadline).is_some() => 3,
        FieldValue::Deadline(Some(_)) => 4,
        FieldValue::Deadline(None) | FieldValue::Missing => 5,
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Dictionary-style ordering: letters compare without regard to case first,
/// and on a tie the lowercase form sorts ahead of the uppercase one.
fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
