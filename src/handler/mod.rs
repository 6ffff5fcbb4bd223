pub mod agents;
pub mod inquiries;
pub mod payments;
pub mod properties;
