use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    models::propertymodel::{ClearableField, NewProperty, Property, PropertyStatus, PropertyUpdate},
};

#[async_trait]
pub trait PropertyExt {
    async fn create_property(&self, property: NewProperty) -> Result<Property, sqlx::Error>;

    async fn get_property_by_id(&self, property_id: Uuid) -> Result<Option<Property>, sqlx::Error>;

    /// Newest first. `None` returns every listing.
    async fn get_all_properties(&self, limit: Option<i64>) -> Result<Vec<Property>, sqlx::Error>;

    async fn get_properties_by_owner(&self, owner_id: &str) -> Result<Vec<Property>, sqlx::Error>;

    async fn update_property(
        &self,
        property_id: Uuid,
        changes: PropertyUpdate,
    ) -> Result<Option<Property>, sqlx::Error>;

    /// Moves the listing to `next` only while it still has status `expected`.
    /// `None` means the row is gone or its status changed underneath us.
    async fn update_property_status(
        &self,
        property_id: Uuid,
        expected: PropertyStatus,
        next: PropertyStatus,
    ) -> Result<Option<Property>, sqlx::Error>;

    /// Returns whether a row was deleted.
    async fn delete_property(&self, property_id: Uuid) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl PropertyExt for DBClient {
    async fn create_property(&self, property: NewProperty) -> Result<Property, sqlx::Error> {
        sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (
                title, description, location, property_type, price,
                bedrooms, bathrooms, area, amenities, rating, images,
                owner_id, owner_email
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(property.title)
        .bind(property.description)
        .bind(property.location)
        .bind(property.property_type)
        .bind(property.price)
        .bind(property.bedrooms)
        .bind(property.bathrooms)
        .bind(property.area)
        .bind(Json(property.amenities))
        .bind(property.rating)
        .bind(Json(property.images))
        .bind(property.owner_id)
        .bind(property.owner_email)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_property_by_id(&self, property_id: Uuid) -> Result<Option<Property>, sqlx::Error> {
        sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = $1")
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_all_properties(&self, limit: Option<i64>) -> Result<Vec<Property>, sqlx::Error> {
        // LIMIT NULL is no limit in Postgres
        sqlx::query_as::<_, Property>(
            "SELECT * FROM properties ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_properties_by_owner(&self, owner_id: &str) -> Result<Vec<Property>, sqlx::Error> {
        sqlx::query_as::<_, Property>(
            "SELECT * FROM properties WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_property(
        &self,
        property_id: Uuid,
        changes: PropertyUpdate,
    ) -> Result<Option<Property>, sqlx::Error> {
        let cleared = [
            ClearableField::Bedrooms,
            ClearableField::Bathrooms,
            ClearableField::Area,
            ClearableField::Rating,
        ]
        .map(|field| changes.clears(field));

        sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                property_type = COALESCE($5, property_type),
                price = COALESCE($6, price),
                bedrooms = CASE WHEN $13 THEN NULL ELSE COALESCE($7, bedrooms) END,
                bathrooms = CASE WHEN $14 THEN NULL ELSE COALESCE($8, bathrooms) END,
                area = CASE WHEN $15 THEN NULL ELSE COALESCE($9, area) END,
                amenities = COALESCE($10, amenities),
                rating = CASE WHEN $16 THEN NULL ELSE COALESCE($11, rating) END,
                images = COALESCE($12, images),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.location)
        .bind(changes.property_type)
        .bind(changes.price)
        .bind(changes.bedrooms)
        .bind(changes.bathrooms)
        .bind(changes.area)
        .bind(changes.amenities.map(Json))
        .bind(changes.rating)
        .bind(changes.images.map(Json))
        .bind(cleared[0])
        .bind(cleared[1])
        .bind(cleared[2])
        .bind(cleared[3])
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_property_status(
        &self,
        property_id: Uuid,
        expected: PropertyStatus,
        next: PropertyStatus,
    ) -> Result<Option<Property>, sqlx::Error> {
        sqlx::query_as::<_, Property>(
            r#"
            UPDATE properties
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(expected)
        .bind(next)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_property(&self, property_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(property_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sqlx::PgPool;

    use super::*;
    use crate::models::propertymodel::PropertyType;

    fn listing(title: &str, price: i64) -> NewProperty {
        NewProperty {
            title: title.to_string(),
            description: format!("{} near the canal", title),
            location: "Lahore".to_string(),
            property_type: PropertyType::House,
            price,
            bedrooms: Some(3),
            bathrooms: Some(2),
            area: Some(1800.0),
            amenities: vec!["Parking".to_string()],
            rating: Some(4.5),
            images: vec!["/media/abc.jpg".to_string()],
            owner_id: "admin-1".to_string(),
            owner_email: "admin@example.com".to_string(),
        }
    }

    async fn backdate(pool: &PgPool, property_id: Uuid, hours: i64) {
        sqlx::query("UPDATE properties SET created_at = $2 WHERE id = $1")
            .bind(property_id)
            .bind(Utc::now() - Duration::hours(hours))
            .execute(pool)
            .await
            .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn status_write_only_applies_from_the_expected_status(pool: PgPool) {
        let db = DBClient::new(pool);
        let created = db.create_property(listing("Lake House", 150_000)).await.unwrap();
        assert_eq!(created.status, PropertyStatus::Available);

        let stale = db
            .update_property_status(created.id, PropertyStatus::Booked, PropertyStatus::Sold)
            .await
            .unwrap();
        assert!(stale.is_none());

        let booked = db
            .update_property_status(created.id, PropertyStatus::Available, PropertyStatus::Booked)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(booked.status, PropertyStatus::Booked);

        let stored = db.get_property_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, PropertyStatus::Booked);

        let missing = db
            .update_property_status(Uuid::new_v4(), PropertyStatus::Available, PropertyStatus::Sold)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn partial_update_keeps_absent_fields(pool: PgPool) {
        let db = DBClient::new(pool);
        let created = db.create_property(listing("Lake House", 150_000)).await.unwrap();

        let updated = db
            .update_property(
                created.id,
                PropertyUpdate {
                    price: Some(140_000),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.price, 140_000);
        assert_eq!(updated.title, "Lake House");
        assert_eq!(updated.bedrooms, Some(3));
        assert_eq!(updated.rating, Some(4.5));
        assert_eq!(updated.images.0, vec!["/media/abc.jpg".to_string()]);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn cleared_fields_become_absent(pool: PgPool) {
        let db = DBClient::new(pool);
        let created = db.create_property(listing("Lake House", 150_000)).await.unwrap();

        let updated = db
            .update_property(
                created.id,
                PropertyUpdate {
                    bathrooms: Some(3),
                    clear: vec![ClearableField::Rating, ClearableField::Area],
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.rating, None);
        assert_eq!(updated.area, None);
        assert_eq!(updated.bathrooms, Some(3));
        assert_eq!(updated.bedrooms, Some(3));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn updating_a_missing_listing_returns_none(pool: PgPool) {
        let db = DBClient::new(pool);

        let result = db
            .update_property(Uuid::new_v4(), PropertyUpdate::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn listings_come_back_newest_first(pool: PgPool) {
        let db = DBClient::new(pool.clone());
        let oldest = db.create_property(listing("Oldest", 1)).await.unwrap();
        let middle = db.create_property(listing("Middle", 2)).await.unwrap();
        let newest = db.create_property(listing("Newest", 3)).await.unwrap();
        backdate(&pool, oldest.id, 3).await;
        backdate(&pool, middle.id, 2).await;
        backdate(&pool, newest.id, 1).await;

        let all = db.get_all_properties(None).await.unwrap();
        let titles: Vec<&str> = all.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Newest", "Middle", "Oldest"]);

        let limited = db.get_all_properties(Some(2)).await.unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].title, "Newest");

        let mine = db.get_properties_by_owner("admin-1").await.unwrap();
        assert_eq!(mine.len(), 3);
        assert!(db.get_properties_by_owner("someone-else").await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn table_constraints_reject_bad_values(pool: PgPool) {
        let db = DBClient::new(pool);

        let negative_price = db.create_property(listing("Cheap", -1)).await.unwrap_err();
        assert!(matches!(negative_price, sqlx::Error::Database(_)));

        let mut overrated = listing("Overrated", 10);
        overrated.rating = Some(6.0);
        assert!(matches!(db.create_property(overrated).await, Err(sqlx::Error::Database(_))));

        let untitled = db.create_property(listing("", 10)).await;
        assert!(matches!(untitled, Err(sqlx::Error::Database(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn delete_reports_whether_a_row_went(pool: PgPool) {
        let db = DBClient::new(pool);
        let created = db.create_property(listing("Lake House", 150_000)).await.unwrap();

        assert!(db.delete_property(created.id).await.unwrap());
        assert!(!db.delete_property(created.id).await.unwrap());
        assert!(db.get_property_by_id(created.id).await.unwrap().is_none());
    }
}
