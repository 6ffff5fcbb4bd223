use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RequestQueryDto {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

/// Trimmed value, or `None` when blank.
pub fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_collapse_to_none() {
        assert_eq!(non_blank(&None), None);
        assert_eq!(non_blank(&Some("   ".to_string())), None);
        assert_eq!(non_blank(&Some(" Lahore ".to_string())), Some("Lahore".to_string()));
    }

    #[test]
    fn limit_is_bounded() {
        assert!(RequestQueryDto { limit: Some(6) }.validate().is_ok());
        assert!(RequestQueryDto { limit: Some(0) }.validate().is_err());
        assert!(RequestQueryDto { limit: None }.validate().is_ok());
    }
}
