//! Configuration documents: schema and loading

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{DeviceCredentials, PolicyConfig};
