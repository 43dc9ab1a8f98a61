//! Model service adapter
//!
//! HTTP-backed implementations of the model collaborators.

pub mod client;
mod models;

pub use client::ModelServiceClient;
