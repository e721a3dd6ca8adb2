pub mod user_fields;
