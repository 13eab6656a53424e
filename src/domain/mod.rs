pub mod crm;
pub mod error;
pub mod object_type;

// Property export tables and records
pub mod property;
