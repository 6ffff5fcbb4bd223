use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    dtos::commondtos::non_blank,
    models::propertymodel::{CatalogVariant, ClearableField, Property, PropertyStatus, PropertyType},
    service::{
        search::{PropertyFilters, PRICE_MAX_UNBOUNDED},
        search_query::SearchQuery,
    },
    utils::currency::{format_price, parse_rupees},
};

fn validate_property_type(label: &str) -> Result<(), ValidationError> {
    match PropertyType::from_label(label) {
        Some(_) => Ok(()),
        None => {
            let mut error = ValidationError::new("property_type");
            error.message = Some(format!("Unknown property type '{}'", label).into());
            Err(error)
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,

    // Any known label: "house", "House" or "Home" all mean the same type
    #[validate(custom = "validate_property_type")]
    pub property_type: String,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: i64,

    //Specifications
    #[validate(range(min = 0, message = "Bedrooms must not be negative"))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0, message = "Bathrooms must not be negative"))]
    pub bathrooms: Option<i32>,
    #[validate(range(min = 0.0, message = "Area must not be negative"))]
    pub area: Option<f64>,

    #[serde(default)]
    pub amenities: Vec<String>,

    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,

    // Data URLs or http(s) links, cover first
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreatePropertyDto {
    pub fn parsed_type(&self) -> Option<PropertyType> {
        PropertyType::from_label(self.property_type.trim())
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyDto {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "Location must not be empty"))]
    pub location: Option<String>,

    #[validate(custom = "validate_property_type")]
    pub property_type: Option<String>,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: Option<i64>,

    #[validate(range(min = 0, message = "Bedrooms must not be negative"))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0, message = "Bathrooms must not be negative"))]
    pub bathrooms: Option<i32>,
    #[validate(range(min = 0.0, message = "Area must not be negative"))]
    pub area: Option<f64>,

    pub amenities: Option<Vec<String>>,

    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: Option<f64>,

    // Replaces the stored list only when present and non-empty
    pub images: Option<Vec<String>>,

    // Specifications to reset to absent
    #[serde(default)]
    pub clear: Vec<ClearableField>,
}

impl UpdatePropertyDto {
    pub fn parsed_type(&self) -> Option<PropertyType> {
        self.property_type
            .as_deref()
            .and_then(|label| PropertyType::from_label(label.trim()))
    }

    pub fn replacement_images(&self) -> Option<&[String]> {
        self.images.as_deref().filter(|images| !images.is_empty())
    }

    /// A field cannot be both set and cleared by one edit.
    pub fn check_clear(&self) -> Result<(), String> {
        let conflict = self.clear.iter().find(|field| match field {
            ClearableField::Bedrooms => self.bedrooms.is_some(),
            ClearableField::Bathrooms => self.bathrooms.is_some(),
            ClearableField::Area => self.area.is_some(),
            ClearableField::Rating => self.rating.is_some(),
        });

        match conflict {
            Some(field) => Err(format!("Cannot both set and clear {}", field.as_str())),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdatePropertyStatusDto {
    pub status: PropertyStatus,
}

/// Query string of the search endpoint. Numbers arrive as strings so that
/// blank form fields read as "unconstrained" instead of failing to parse.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PropertySearchQueryDto {
    pub q: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    /// Home-page bracket, `min-max` or `min+`.
    pub price: Option<String>,
    pub beds: Option<String>,
    pub baths: Option<String>,
    pub rating: Option<String>,
}

impl PropertySearchQueryDto {
    /// Maps the wire sentinels onto `None` and parses the free text.
    pub fn into_parts(&self) -> Result<(SearchQuery, PropertyFilters), String> {
        let query = self
            .q
            .as_deref()
            .map(SearchQuery::parse)
            .unwrap_or_default();

        let (bracket_min, bracket_max) = match non_blank(&self.price) {
            Some(bracket) => parse_price_bracket(&bracket)?,
            None => (None, None),
        };

        let price_min = parse_field::<i64>(&self.price_min, "priceMin")?.or(bracket_min);
        let price_max = parse_field::<i64>(&self.price_max, "priceMax")?.or(bracket_max);

        if price_min.is_some_and(|min| min < 0) || price_max.is_some_and(|max| max < 0) {
            return Err("Price bounds must not be negative".to_string());
        }

        let beds = parse_field::<i32>(&self.beds, "beds")?;
        let baths = parse_field::<i32>(&self.baths, "baths")?;
        if beds.is_some_and(|n| n < 0) || baths.is_some_and(|n| n < 0) {
            return Err("Bedroom and bathroom minimums must not be negative".to_string());
        }

        let rating = parse_field::<f64>(&self.rating, "rating")?;
        if rating.is_some_and(|r| !(0.0..=5.0).contains(&r)) {
            return Err("Rating must be between 0 and 5".to_string());
        }

        let filters = PropertyFilters {
            location: non_blank(&self.location),
            property_type: non_blank(&self.property_type),
            price_min: price_min.filter(|&min| min != 0),
            price_max: price_max.filter(|&max| max < PRICE_MAX_UNBOUNDED),
            beds: beds.filter(|&n| n != 0),
            baths: baths.filter(|&n| n != 0),
            rating: rating.filter(|&r| r != 0.0),
        };

        Ok((query, filters))
    }
}

fn parse_field<T: std::str::FromStr>(value: &Option<String>, name: &str) -> Result<Option<T>, String> {
    non_blank(value)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|_| format!("{} must be a number, got '{}'", name, raw))
        })
        .transpose()
}

fn parse_price_bracket(bracket: &str) -> Result<(Option<i64>, Option<i64>), String> {
    let invalid = || format!("price must look like 'min-max' or 'min+', got '{}'", bracket);

    if let Some(min) = bracket.strip_suffix('+') {
        return Ok((Some(parse_rupees(min).map_err(|_| invalid())?), None));
    }

    let (min, max) = bracket.split_once('-').ok_or_else(invalid)?;
    let min = parse_rupees(min).map_err(|_| invalid())?;
    let max = parse_rupees(max).map_err(|_| invalid())?;

    Ok((Some(min), Some(max)))
}

/// Card shown in listing grids and search results.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummaryDto {
    pub id: Uuid,
    pub title: String,
    pub location: String,
    pub property_type: PropertyType,
    pub type_label: String,
    pub price: i64,
    pub display_price: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<f64>,
    pub rating: Option<f64>,
    pub cover_image: Option<String>,
    pub status: PropertyStatus,
    pub created_at: DateTime<Utc>,
}

impl PropertySummaryDto {
    pub fn from_property(property: &Property, variant: CatalogVariant) -> Self {
        PropertySummaryDto {
            id: property.id,
            title: property.title.clone(),
            location: property.location.clone(),
            property_type: property.property_type,
            type_label: variant.label_for(property.property_type).to_string(),
            price: property.price,
            display_price: format_price(property.price, property.property_type.price_period()),
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            area: property.area,
            rating: property.rating,
            cover_image: property.cover_image().map(str::to_string),
            status: property.status,
            created_at: property.created_at,
        }
    }

    pub fn from_properties<'a>(
        properties: impl IntoIterator<Item = &'a Property>,
        variant: CatalogVariant,
    ) -> Vec<PropertySummaryDto> {
        properties
            .into_iter()
            .map(|property| PropertySummaryDto::from_property(property, variant))
            .collect()
    }
}

/// Full record plus the presentation fields of the detail page.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetailDto {
    #[serde(flatten)]
    pub property: Property,
    pub type_label: String,
    pub display_price: String,
}

impl PropertyDetailDto {
    pub fn from_property(property: Property, variant: CatalogVariant) -> Self {
        PropertyDetailDto {
            type_label: variant.label_for(property.property_type).to_string(),
            display_price: format_price(property.price, property.property_type.price_period()),
            property,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PropertyTypeOptionDto {
    pub value: String,
    pub label: String,
}

impl PropertyTypeOptionDto {
    pub fn for_variant(variant: CatalogVariant) -> Vec<PropertyTypeOptionDto> {
        variant
            .property_types()
            .iter()
            .map(|property_type| PropertyTypeOptionDto {
                value: property_type.as_str().to_string(),
                label: variant.label_for(*property_type).to_string(),
            })
            .collect()
    }
}
