//! Backend API surface: the client shim plus one typed module per feature

pub mod auth;
pub mod budget;
pub mod client;
pub mod crypto;
pub mod investments;
pub mod market;

pub use client::ApiClient;
