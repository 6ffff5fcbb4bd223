use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::paymentmodel::{NewPaymentRequest, PaymentMethod, PaymentStatus};

fn validate_digits(value: &str) -> Result<(), validator::ValidationError> {
    let digits = value.chars().filter(|c| !matches!(c, ' ' | '-' | '+')).collect::<String>();
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("digits");
        error.message = Some("Must contain only digits".into());
        Err(error)
    }
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EasypaisaPaymentDto {
    pub property_id: Uuid,

    #[validate(length(min = 1, message = "Name is required"))]
    pub customer_name: String,

    #[validate(email(message = "Email is invalid"))]
    pub customer_email: String,

    #[validate(
        length(min = 10, max = 15, message = "EasyPaisa number must be between 10 and 15 characters"),
        custom = "validate_digits"
    )]
    pub phone_number: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

impl EasypaisaPaymentDto {
    pub fn into_new_request(self, property_title: String, amount: i64) -> NewPaymentRequest {
        NewPaymentRequest {
            property_id: self.property_id,
            property_title,
            amount,
            payment_method: PaymentMethod::Easypaisa,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.phone_number.clone(),
            transaction_id: None,
            easypaisa_number: Some(self.phone_number),
            bank_account_number: None,
            bank_name: None,
            notes: self.description,
        }
    }
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankTransferPaymentDto {
    pub property_id: Uuid,

    #[validate(length(min = 1, message = "Name is required"))]
    pub customer_name: String,

    #[validate(email(message = "Email is invalid"))]
    pub customer_email: String,

    #[validate(length(min = 7, max = 20, message = "Phone number must be between 7 and 20 characters"))]
    pub customer_phone: String,

    #[validate(
        length(min = 6, max = 34, message = "Account number must be between 6 and 34 characters")
    )]
    pub account_number: String,

    #[validate(length(min = 1, message = "Bank name is required"))]
    pub bank_name: String,

    #[validate(length(min = 1, message = "Account holder is required"))]
    pub account_holder: String,

    pub reference: Option<String>,
}

impl BankTransferPaymentDto {
    pub fn into_new_request(self, property_title: String, amount: i64) -> NewPaymentRequest {
        NewPaymentRequest {
            property_id: self.property_id,
            property_title,
            amount,
            payment_method: PaymentMethod::BankTransfer,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            transaction_id: self.reference.filter(|r| !r.trim().is_empty()),
            easypaisa_number: None,
            bank_account_number: Some(self.account_number),
            bank_name: Some(self.bank_name),
            notes: Some(format!("Bank transfer to {}", self.account_holder)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentStatusDto {
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PaymentQueryDto {
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn easypaisa() -> EasypaisaPaymentDto {
        EasypaisaPaymentDto {
            property_id: Uuid::new_v4(),
            customer_name: "Sana".to_string(),
            customer_email: "sana@example.com".to_string(),
            phone_number: "03451234567".to_string(),
            description: Some("Booking deposit".to_string()),
        }
    }

    #[test]
    fn easypaisa_number_doubles_as_customer_phone() {
        let request = easypaisa().into_new_request("Lake House".to_string(), 150_000);

        assert_eq!(request.payment_method, PaymentMethod::Easypaisa);
        assert_eq!(request.customer_phone, "03451234567");
        assert_eq!(request.easypaisa_number.as_deref(), Some("03451234567"));
        assert_eq!(request.notes.as_deref(), Some("Booking deposit"));
        assert_eq!(request.amount, 150_000);
    }

    #[test]
    fn easypaisa_number_must_be_digits() {
        let mut dto = easypaisa();
        dto.phone_number = "0345-CALL-ME".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn bank_transfer_notes_name_the_holder() {
        let dto = BankTransferPaymentDto {
            property_id: Uuid::new_v4(),
            customer_name: "Usman".to_string(),
            customer_email: "usman@example.com".to_string(),
            customer_phone: "03001112233".to_string(),
            account_number: "PK36SCBL0000001123456702".to_string(),
            bank_name: "Meezan Bank".to_string(),
            account_holder: "PropertyDeals Ltd".to_string(),
            reference: Some("  ".to_string()),
        };
        assert!(dto.validate().is_ok());

        let request = dto.into_new_request("City Flat".to_string(), 80_000);
        assert_eq!(request.payment_method, PaymentMethod::BankTransfer);
        assert_eq!(request.notes.as_deref(), Some("Bank transfer to PropertyDeals Ltd"));
        assert_eq!(request.transaction_id, None);
    }
}
