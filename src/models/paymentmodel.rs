use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Easypaisa,
    BankTransfer,
    Cash,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Cancelled,
}

/// A recorded payment intent. Nothing here talks to a payment gateway.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub id: Uuid,
    pub property_id: Uuid,
    pub property_title: String,
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub status: PaymentStatus,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub transaction_id: Option<String>,
    pub easypaisa_number: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload shared by every payment method.
#[derive(Debug, Clone)]
pub struct NewPaymentRequest {
    pub property_id: Uuid,
    pub property_title: String,
    pub amount: i64,
    pub payment_method: PaymentMethod,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub transaction_id: Option<String>,
    pub easypaisa_number: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_name: Option<String>,
    pub notes: Option<String>,
}
