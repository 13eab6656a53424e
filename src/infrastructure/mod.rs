pub mod bootstrap;
pub mod config;
pub mod csv;
pub mod hubspot;
pub mod response;
