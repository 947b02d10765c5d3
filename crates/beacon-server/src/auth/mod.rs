//! Token verification for the console API

pub mod model;
pub mod token;
