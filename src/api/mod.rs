pub mod client;
pub mod models;
pub mod routes;
pub mod service;

pub use client::MailServiceClient;
pub use service::MailService;
