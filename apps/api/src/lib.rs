pub mod chat;
pub mod config;
pub mod errors;
pub mod llm_client;
pub mod market;
pub mod recruit;
pub mod routes;
pub mod state;
