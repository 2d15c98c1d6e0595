pub mod humor_service;
pub mod models;

pub use humor_service::{ChatProvider, HumorService};
pub use models::{ChatMessage, HumorConfig, HumorError};
