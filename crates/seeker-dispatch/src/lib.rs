pub mod coordinator;
pub mod error;
pub mod request;
pub mod settings;
pub mod stats;
