use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    models::inquirymodel::{Inquiry, InquiryStatus},
};

#[async_trait]
pub trait InquiryExt {
    async fn create_inquiry<T: Into<String> + Send>(
        &self,
        property_id: Uuid,
        property_title: T,
        name: T,
        email: T,
        phone: T,
        message: T,
    ) -> Result<Inquiry, sqlx::Error>;

    async fn get_inquiries(&self) -> Result<Vec<Inquiry>, sqlx::Error>;

    async fn update_inquiry_status(
        &self,
        inquiry_id: Uuid,
        status: InquiryStatus,
    ) -> Result<Option<Inquiry>, sqlx::Error>;
}

#[async_trait]
impl InquiryExt for DBClient {
    async fn create_inquiry<T: Into<String> + Send>(
        &self,
        property_id: Uuid,
        property_title: T,
        name: T,
        email: T,
        phone: T,
        message: T,
    ) -> Result<Inquiry, sqlx::Error> {
        sqlx::query_as::<_, Inquiry>(
            r#"
            INSERT INTO inquiries (property_id, property_title, name, email, phone, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(property_title.into())
        .bind(name.into())
        .bind(email.into())
        .bind(phone.into())
        .bind(message.into())
        .fetch_one(&self.pool)
        .await
    }

    async fn get_inquiries(&self) -> Result<Vec<Inquiry>, sqlx::Error> {
        sqlx::query_as::<_, Inquiry>("SELECT * FROM inquiries ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    async fn update_inquiry_status(
        &self,
        inquiry_id: Uuid,
        status: InquiryStatus,
    ) -> Result<Option<Inquiry>, sqlx::Error> {
        sqlx::query_as::<_, Inquiry>(
            "UPDATE inquiries SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(inquiry_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }
}
