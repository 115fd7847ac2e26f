//! Firestore adapter
//!
//! Talks to Cloud Firestore, or the Firestore emulator, over the v1 REST API.

pub mod auth;
pub mod client;
pub mod models;

pub use auth::{ServiceAccountAuth, ServiceAccountKey};
pub use client::FirestoreClient;
