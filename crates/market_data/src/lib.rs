pub mod endpoints;
pub mod normalizer;
pub mod remote;
pub mod services;
pub mod traits;
