pub mod aggregate;
pub mod status;
pub mod sweep;
