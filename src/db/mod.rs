pub mod agentdb;
pub mod db;
pub mod inquirydb;
pub mod paymentdb;
pub mod propertydb;
