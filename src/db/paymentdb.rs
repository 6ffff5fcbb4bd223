use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    models::paymentmodel::{NewPaymentRequest, PaymentRequest, PaymentStatus},
};

#[async_trait]
pub trait PaymentExt {
    async fn create_payment_request(&self, payment: NewPaymentRequest) -> Result<PaymentRequest, sqlx::Error>;

    async fn get_payment_requests(&self) -> Result<Vec<PaymentRequest>, sqlx::Error>;

    async fn get_payment_requests_by_property(
        &self,
        property_id: Uuid,
    ) -> Result<Vec<PaymentRequest>, sqlx::Error>;

    async fn get_payment_requests_by_email(&self, email: &str) -> Result<Vec<PaymentRequest>, sqlx::Error>;

    /// A `None` transaction id leaves the stored one untouched.
    async fn update_payment_status(
        &self,
        payment_id: Uuid,
        status: PaymentStatus,
        transaction_id: Option<String>,
    ) -> Result<Option<PaymentRequest>, sqlx::Error>;
}

#[async_trait]
impl PaymentExt for DBClient {
    async fn create_payment_request(&self, payment: NewPaymentRequest) -> Result<PaymentRequest, sqlx::Error> {
        sqlx::query_as::<_, PaymentRequest>(
            r#"
            INSERT INTO payments (
                property_id, property_title, amount, payment_method,
                customer_name, customer_email, customer_phone,
                transaction_id, easypaisa_number, bank_account_number, bank_name, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(payment.property_id)
        .bind(payment.property_title)
        .bind(payment.amount)
        .bind(payment.payment_method)
        .bind(payment.customer_name)
        .bind(payment.customer_email)
        .bind(payment.customer_phone)
        .bind(payment.transaction_id)
        .bind(payment.easypaisa_number)
        .bind(payment.bank_account_number)
        .bind(payment.bank_name)
        .bind(payment.notes)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_payment_requests(&self) -> Result<Vec<PaymentRequest>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRequest>("SELECT * FROM payments ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    async fn get_payment_requests_by_property(
        &self,
        property_id: Uuid,
    ) -> Result<Vec<PaymentRequest>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRequest>(
            "SELECT * FROM payments WHERE property_id = $1 ORDER BY created_at DESC",
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_payment_requests_by_email(&self, email: &str) -> Result<Vec<PaymentRequest>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRequest>(
            "SELECT * FROM payments WHERE customer_email = $1 ORDER BY created_at DESC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_payment_status(
        &self,
        payment_id: Uuid,
        status: PaymentStatus,
        transaction_id: Option<String>,
    ) -> Result<Option<PaymentRequest>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRequest>(
            r#"
            UPDATE payments
            SET status = $2, transaction_id = COALESCE($3, transaction_id), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(payment_id)
        .bind(status)
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;
    use crate::models::paymentmodel::PaymentMethod;

    fn request(property_id: Uuid, email: &str, amount: i64) -> NewPaymentRequest {
        NewPaymentRequest {
            property_id,
            property_title: "Lake House".to_string(),
            amount,
            payment_method: PaymentMethod::Easypaisa,
            customer_name: "Ali".to_string(),
            customer_email: email.to_string(),
            customer_phone: "03001234567".to_string(),
            transaction_id: Some("EP-1001".to_string()),
            easypaisa_number: Some("03001234567".to_string()),
            bank_account_number: None,
            bank_name: None,
            notes: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn status_update_keeps_transaction_id_when_absent(pool: PgPool) {
        let db = DBClient::new(pool);
        let created = db.create_payment_request(request(Uuid::new_v4(), "ali@example.com", 150_000)).await.unwrap();
        assert_eq!(created.status, PaymentStatus::Pending);

        let completed = db
            .update_payment_status(created.id, PaymentStatus::Completed, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(completed.status, PaymentStatus::Completed);
        assert_eq!(completed.transaction_id.as_deref(), Some("EP-1001"));

        let replaced = db
            .update_payment_status(created.id, PaymentStatus::Completed, Some("EP-2002".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.transaction_id.as_deref(), Some("EP-2002"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn requests_filter_by_property_and_email(pool: PgPool) {
        let db = DBClient::new(pool);
        let lake_house = Uuid::new_v4();
        let city_flat = Uuid::new_v4();

        db.create_payment_request(request(lake_house, "ali@example.com", 150_000)).await.unwrap();
        db.create_payment_request(request(lake_house, "sara@example.com", 150_000)).await.unwrap();
        db.create_payment_request(request(city_flat, "ali@example.com", 80_000)).await.unwrap();

        assert_eq!(db.get_payment_requests().await.unwrap().len(), 3);
        assert_eq!(db.get_payment_requests_by_property(lake_house).await.unwrap().len(), 2);

        let ali = db.get_payment_requests_by_email("ali@example.com").await.unwrap();
        assert_eq!(ali.len(), 2);
        assert!(ali.iter().all(|payment| payment.customer_email == "ali@example.com"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn negative_amounts_are_refused(pool: PgPool) {
        let db = DBClient::new(pool);

        let result = db.create_payment_request(request(Uuid::new_v4(), "ali@example.com", -5)).await;
        assert!(matches!(result, Err(sqlx::Error::Database(_))));
    }
}
