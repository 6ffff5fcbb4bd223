// Free-text query parsing for the property search.
//
// A query is a mix of plain words and `field:value` terms:
//
//     lake house beds:3+ area:1000-2000
//
// Plain words are re-joined into one lower-cased phrase matched as a substring
// of the text fields. Terms constrain numeric fields explicitly.

use crate::models::propertymodel::Property;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericField {
    Bedrooms,
    Bathrooms,
    Area,
    Price,
}

impl NumericField {
    fn from_key(key: &str) -> Option<NumericField> {
        match key.to_lowercase().as_str() {
            "beds" | "bed" | "bedrooms" => Some(NumericField::Bedrooms),
            "baths" | "bath" | "bathrooms" => Some(NumericField::Bathrooms),
            "area" | "sqft" | "size" => Some(NumericField::Area),
            "price" => Some(NumericField::Price),
            _ => None,
        }
    }

    fn value_of(&self, property: &Property) -> Option<f64> {
        match self {
            NumericField::Bedrooms => property.bedrooms.map(f64::from),
            NumericField::Bathrooms => property.bathrooms.map(f64::from),
            NumericField::Area => property.area,
            NumericField::Price => Some(property.price as f64),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Exact(f64),
    AtLeast(f64),
    Between(f64, f64),
}

impl Bound {
    /// Accepts `N`, `N+` and `N-M`.
    fn parse(raw: &str) -> Option<Bound> {
        if let Some(min) = raw.strip_suffix('+') {
            return parse_number(min).map(Bound::AtLeast);
        }

        if let Some((low, high)) = raw.split_once('-') {
            let (low, high) = (parse_number(low)?, parse_number(high)?);
            return (low <= high).then_some(Bound::Between(low, high));
        }

        parse_number(raw).map(Bound::Exact)
    }

    fn contains(&self, value: f64) -> bool {
        match *self {
            Bound::Exact(expected) => value == expected,
            Bound::AtLeast(min) => value >= min,
            Bound::Between(low, high) => value >= low && value <= high,
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let value = raw.trim().replace(',', "").parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldTerm {
    pub field: NumericField,
    pub bound: Bound,
}

impl FieldTerm {
    fn parse(token: &str) -> Option<FieldTerm> {
        let (key, value) = token.split_once(':')?;
        Some(FieldTerm {
            field: NumericField::from_key(key)?,
            bound: Bound::parse(value)?,
        })
    }

    pub fn matches(&self, property: &Property) -> bool {
        self.field
            .value_of(property)
            .is_some_and(|value| self.bound.contains(value))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    /// Lower-cased phrase built from every token that is not a field term.
    pub phrase: Option<String>,
    pub terms: Vec<FieldTerm>,
}

impl SearchQuery {
    pub fn parse(raw: &str) -> SearchQuery {
        let mut words = Vec::new();
        let mut terms = Vec::new();

        for token in raw.split_whitespace() {
            match FieldTerm::parse(token) {
                Some(term) => terms.push(term),
                None => words.push(token),
            }
        }

        let phrase = (!words.is_empty()).then(|| words.join(" ").to_lowercase());

        SearchQuery { phrase, terms }
    }

    pub fn is_empty(&self) -> bool {
        self.phrase.is_none() && self.terms.is_empty()
    }

    pub fn matches(&self, property: &Property) -> bool {
        let phrase_matches = match &self.phrase {
            Some(phrase) => text_contains(property, phrase),
            None => true,
        };

        phrase_matches && self.terms.iter().all(|term| term.matches(property))
    }
}

fn text_contains(property: &Property, phrase: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(phrase);

    contains(&property.title)
        || contains(&property.location)
        || property.property_type.names().any(contains)
        || contains(&property.description)
        || property.amenities.0.iter().any(|amenity| contains(amenity.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_queries_are_empty() {
        assert!(SearchQuery::parse("").is_empty());
        assert!(SearchQuery::parse("   \t ").is_empty());
    }

    #[test]
    fn plain_words_form_one_lowercase_phrase() {
        let query = SearchQuery::parse("  Lake   HOUSE ");
        assert_eq!(query.phrase.as_deref(), Some("lake house"));
        assert!(query.terms.is_empty());
    }

    #[test]
    fn field_terms_are_extracted() {
        let query = SearchQuery::parse("villa beds:3+ sqft:1,000-2,500 baths:2 price:500000");

        assert_eq!(query.phrase.as_deref(), Some("villa"));
        assert_eq!(
            query.terms,
            vec![
                FieldTerm { field: NumericField::Bedrooms, bound: Bound::AtLeast(3.0) },
                FieldTerm { field: NumericField::Area, bound: Bound::Between(1000.0, 2500.0) },
                FieldTerm { field: NumericField::Bathrooms, bound: Bound::Exact(2.0) },
                FieldTerm { field: NumericField::Price, bound: Bound::Exact(500000.0) },
            ]
        );
    }

    #[test]
    fn malformed_terms_fall_back_to_text() {
        let query = SearchQuery::parse("beds:many garden:yes area:9-3");
        assert!(query.terms.is_empty());
        assert_eq!(query.phrase.as_deref(), Some("beds:many garden:yes area:9-3"));
    }

    #[test]
    fn keywords_alone_do_not_enable_numeric_matching() {
        // bedroom counts need an explicit `beds:` term
        let query = SearchQuery::parse("3 bed");
        assert!(query.terms.is_empty());
        assert_eq!(query.phrase.as_deref(), Some("3 bed"));
    }
}
