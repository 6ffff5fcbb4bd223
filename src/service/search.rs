use crate::{
    models::propertymodel::Property,
    service::search_query::SearchQuery,
};

/// A `priceMax` at or above this is the slider's "no upper limit" position.
pub const PRICE_MAX_UNBOUNDED: i64 = 1_000_000_000_000;

/// Structured sidebar filters. `None` leaves a dimension unconstrained; the
/// request DTO maps the form sentinels (empty string, zero, unbounded max)
/// onto `None` before the filters reach this type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilters {
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub beds: Option<i32>,
    pub baths: Option<i32>,
    pub rating: Option<f64>,
}

impl PropertyFilters {
    pub fn is_unconstrained(&self) -> bool {
        *self == PropertyFilters::default()
    }

    pub fn matches(&self, property: &Property) -> bool {
        if let Some(location) = &self.location {
            if !property.location.to_lowercase().contains(&location.to_lowercase()) {
                return false;
            }
        }

        if let Some(wanted) = self.property_type.as_deref() {
            if !property.property_type.names().any(|name| name == wanted) {
                return false;
            }
        }

        if self.price_min.is_some_and(|min| property.price < min) {
            return false;
        }

        if self.price_max.is_some_and(|max| property.price > max) {
            return false;
        }

        at_least(property.bedrooms.map(f64::from), self.beds.map(f64::from))
            && at_least(property.bathrooms.map(f64::from), self.baths.map(f64::from))
            && at_least(property.rating, self.rating)
    }
}

// A record without the value fails any active minimum.
fn at_least(value: Option<f64>, min: Option<f64>) -> bool {
    match min {
        None => true,
        Some(min) => value.is_some_and(|value| value >= min),
    }
}

/// Narrows `records` to those matching the query and every active filter.
/// Free text narrows first, then the structured filters. Input order is kept.
pub fn search<'a>(
    records: &'a [Property],
    query: &SearchQuery,
    filters: &PropertyFilters,
) -> Vec<&'a Property> {
    records
        .iter()
        .filter(|property| query.is_empty() || query.matches(property))
        .filter(|property| filters.matches(property))
        .collect()
}
