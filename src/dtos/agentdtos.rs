use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentDto {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, message = "Specialization is required"))]
    pub specialization: String,

    #[validate(range(min = 0, max = 80, message = "Experience must be between 0 and 80 years"))]
    pub experience_years: Option<i32>,

    #[validate(length(min = 7, max = 20, message = "Phone number must be between 7 and 20 characters"))]
    pub phone: String,

    #[validate(email(message = "Email is invalid"))]
    pub email: String,

    /// Data URL or http(s) link.
    pub photo: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAgentDto {
    #[validate(length(min = 1, message = "Full name must not be empty"))]
    pub full_name: Option<String>,

    #[validate(length(min = 1, message = "Specialization must not be empty"))]
    pub specialization: Option<String>,

    #[validate(range(min = 0, max = 80, message = "Experience must be between 0 and 80 years"))]
    pub experience_years: Option<i32>,

    #[validate(length(min = 7, max = 20, message = "Phone number must be between 7 and 20 characters"))]
    pub phone: Option<String>,

    #[validate(email(message = "Email is invalid"))]
    pub email: Option<String>,

    pub photo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_contact_details_are_checked() {
        let mut dto = CreateAgentDto {
            full_name: "Ayesha Khan".to_string(),
            specialization: "Residential".to_string(),
            experience_years: Some(6),
            phone: "03001234567".to_string(),
            email: "ayesha@example.com".to_string(),
            photo: None,
        };
        assert!(dto.validate().is_ok());

        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn partial_update_validates_only_given_fields() {
        assert!(UpdateAgentDto::default().validate().is_ok());

        let dto = UpdateAgentDto {
            phone: Some("12".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }
}
