pub mod core;
pub mod params;
