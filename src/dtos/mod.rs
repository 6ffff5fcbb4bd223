pub mod agentdtos;
pub mod commondtos;
pub mod inquirydtos;
pub mod paymentdtos;
pub mod propertydtos;
