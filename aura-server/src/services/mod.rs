//! External service integrations

pub mod youtube;
