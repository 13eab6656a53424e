pub mod bulk_upload_session;
pub mod csv_normalizer;
pub mod property_builder;
pub mod property_gateway;
pub mod table_editor;
