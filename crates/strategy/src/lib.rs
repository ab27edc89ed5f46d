pub mod analysis;
pub mod forecast;
pub mod signals;
