use chrono::{TimeZone, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::propertymodel::{Property, PropertyStatus, PropertyType};

pub fn property(title: &str, location: &str, price: i64) -> Property {
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    Property {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: format!("{} in {}", title, location),
        location: location.to_string(),
        property_type: PropertyType::House,
        price,
        bedrooms: None,
        bathrooms: None,
        area: None,
        amenities: Json(Vec::new()),
        rating: None,
        images: Json(Vec::new()),
        status: PropertyStatus::Available,
        owner_id: "owner-1".to_string(),
        owner_email: "owner@example.com".to_string(),
        created_at,
        updated_at: created_at,
    }
}

/// The two listings used throughout the search tests.
pub fn lake_house_and_city_flat() -> Vec<Property> {
    let mut lake_house = property("Lake House", "Lahore, Punjab", 150_000);
    lake_house.bedrooms = Some(3);
    lake_house.bathrooms = Some(2);
    lake_house.area = Some(2400.0);
    lake_house.rating = Some(4.5);
    lake_house.amenities = Json(vec!["Garden".to_string(), "Parking".to_string()]);

    let mut city_flat = property("City Flat", "Karachi", 80_000);
    city_flat.property_type = PropertyType::Apartment;
    city_flat.bedrooms = Some(2);
    city_flat.bathrooms = Some(1);
    city_flat.area = Some(900.0);
    city_flat.rating = Some(3.5);
    city_flat.amenities = Json(vec!["Elevator".to_string()]);

    vec![lake_house, city_flat]
}
