//! Route handlers for the HTTP API.

pub mod favorites;
pub mod health;
pub mod movies;
