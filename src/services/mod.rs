// Service exports
pub mod memory;
pub mod messaging;
pub mod store;

pub use memory::InMemoryStore;
pub use messaging::{GatewayError, LoggingGateway, MessageGateway, RecordingGateway};
pub use store::{RecordStore, StoreError};
