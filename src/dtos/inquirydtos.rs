use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::inquirymodel::InquiryStatus;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiryDto {
    pub property_id: Uuid,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Email is invalid"))]
    pub email: String,

    #[validate(length(min = 7, max = 20, message = "Phone number must be between 7 and 20 characters"))]
    pub phone: String,

    #[validate(length(min = 1, max = 2000, message = "Message must be between 1 and 2000 characters"))]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInquiryStatusDto {
    pub status: InquiryStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inquiry_requires_a_message() {
        let dto = CreateInquiryDto {
            property_id: Uuid::new_v4(),
            name: "Bilal".to_string(),
            email: "bilal@example.com".to_string(),
            phone: "03211234567".to_string(),
            message: String::new(),
        };

        assert!(dto.validate().is_err());
    }

    #[test]
    fn status_uses_lowercase_names() {
        let dto: UpdateInquiryStatusDto = serde_json::from_str(r#"{"status":"contacted"}"#).unwrap();
        assert_eq!(dto.status, InquiryStatus::Contacted);
    }
}
