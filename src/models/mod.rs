pub mod agentmodel;
pub mod inquirymodel;
pub mod paymentmodel;
pub mod propertymodel;
pub mod usermodel;
