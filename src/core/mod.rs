pub mod config;

pub use config::CompassConfig;
