pub mod errors;
pub mod producto;
