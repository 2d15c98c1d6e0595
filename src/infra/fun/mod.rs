pub mod uselessfacts_client;

pub use uselessfacts_client::UselessFactsClient;
