pub mod models;
pub mod status;
