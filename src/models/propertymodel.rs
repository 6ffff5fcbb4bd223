use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "property_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Available,
    Booked,
    Sold,
}

impl PropertyStatus {
    pub fn to_str(&self) -> &str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Booked => "booked",
            PropertyStatus::Sold => "sold",
        }
    }

    /// Allowed moves: available -> booked, available -> sold, booked -> sold,
    /// anything -> available. Re-applying the current status is a no-op.
    pub fn can_transition_to(&self, next: PropertyStatus) -> bool {
        if *self == next {
            return true;
        }

        matches!(
            (self, next),
            (_, PropertyStatus::Available)
                | (PropertyStatus::Available, PropertyStatus::Booked)
                | (PropertyStatus::Available, PropertyStatus::Sold)
                | (PropertyStatus::Booked, PropertyStatus::Sold)
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "property_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Apartment,
    Condo,
    Villa,
    Hotel,
    Hostel,
}

impl PropertyType {
    pub const ALL: [PropertyType; 6] = [
        PropertyType::House,
        PropertyType::Apartment,
        PropertyType::Condo,
        PropertyType::Villa,
        PropertyType::Hotel,
        PropertyType::Hostel,
    ];

    /// Canonical wire and storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Apartment => "apartment",
            PropertyType::Condo => "condo",
            PropertyType::Villa => "villa",
            PropertyType::Hotel => "hotel",
            PropertyType::Hostel => "hostel",
        }
    }

    pub fn residential_label(&self) -> &'static str {
        match self {
            PropertyType::House => "House",
            PropertyType::Apartment => "Apartment",
            PropertyType::Condo => "Condo",
            PropertyType::Villa => "Villa",
            PropertyType::Hotel => "Hotel",
            PropertyType::Hostel => "Hostel",
        }
    }

    /// Label used by the hospitality catalog (Home / Flat / Hotel / Hostel).
    pub fn hospitality_label(&self) -> Option<&'static str> {
        match self {
            PropertyType::House => Some("Home"),
            PropertyType::Apartment => Some("Flat"),
            PropertyType::Hotel => Some("Hotel"),
            PropertyType::Hostel => Some("Hostel"),
            PropertyType::Condo | PropertyType::Villa => None,
        }
    }

    /// Every name this type is known by, canonical first.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        [Some(self.as_str()), Some(self.residential_label()), self.hospitality_label()]
            .into_iter()
            .flatten()
    }

    /// Case-sensitive lookup over all known names.
    pub fn from_label(label: &str) -> Option<PropertyType> {
        PropertyType::ALL
            .into_iter()
            .find(|t| t.names().any(|name| name == label))
    }

    /// Short-stay types are priced per night, the rest per month.
    pub fn price_period(&self) -> &'static str {
        match self {
            PropertyType::Hotel | PropertyType::Hostel => "night",
            _ => "month",
        }
    }
}

/// Which property vocabulary a deployment offers in its forms and filters.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CatalogVariant {
    Residential,
    Hospitality,
}

impl CatalogVariant {
    pub fn property_types(&self) -> &'static [PropertyType] {
        match self {
            CatalogVariant::Residential => &[
                PropertyType::House,
                PropertyType::Apartment,
                PropertyType::Condo,
                PropertyType::Villa,
            ],
            CatalogVariant::Hospitality => &[
                PropertyType::House,
                PropertyType::Apartment,
                PropertyType::Hotel,
                PropertyType::Hostel,
            ],
        }
    }

    pub fn label_for(&self, property_type: PropertyType) -> &'static str {
        match self {
            CatalogVariant::Residential => property_type.residential_label(),
            CatalogVariant::Hospitality => property_type
                .hospitality_label()
                .unwrap_or_else(|| property_type.residential_label()),
        }
    }

    pub fn accepts(&self, property_type: PropertyType) -> bool {
        self.property_types().contains(&property_type)
    }
}

impl std::str::FromStr for CatalogVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "residential" => Ok(CatalogVariant::Residential),
            "hospitality" => Ok(CatalogVariant::Hospitality),
            other => Err(format!("unknown catalog variant '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,

    // Basic listing info
    pub title: String,
    pub description: String,
    pub location: String,
    pub property_type: PropertyType,

    pub price: i64,

    // Specifications
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<f64>,
    pub amenities: Json<Vec<String>>,
    pub rating: Option<f64>,

    // Ordered image URLs, index 0 is the cover
    pub images: Json<Vec<String>>,

    pub status: PropertyStatus,

    pub owner_id: String,
    pub owner_email: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn cover_image(&self) -> Option<&str> {
        self.images.0.first().map(String::as_str)
    }
}

/// Insert payload. Images are already resolved to stored URLs.
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub title: String,
    pub description: String,
    pub location: String,
    pub property_type: PropertyType,
    pub price: i64,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<f64>,
    pub amenities: Vec<String>,
    pub rating: Option<f64>,
    pub images: Vec<String>,
    pub owner_id: String,
    pub owner_email: String,
}

/// Optional specifications an edit may reset to absent.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ClearableField {
    Bedrooms,
    Bathrooms,
    Area,
    Rating,
}

impl ClearableField {
    pub fn as_str(&self) -> &str {
        match self {
            ClearableField::Bedrooms => "bedrooms",
            ClearableField::Bathrooms => "bathrooms",
            ClearableField::Area => "area",
            ClearableField::Rating => "rating",
        }
    }
}

/// Partial update; `None` keeps the stored value unless the field is listed
/// in `clear`.
#[derive(Debug, Clone, Default)]
pub struct PropertyUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub property_type: Option<PropertyType>,
    pub price: Option<i64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<f64>,
    pub amenities: Option<Vec<String>>,
    pub rating: Option<f64>,
    pub images: Option<Vec<String>>,
    pub clear: Vec<ClearableField>,
}

impl PropertyUpdate {
    pub fn clears(&self, field: ClearableField) -> bool {
        self.clear.contains(&field)
    }
}
