//! SeaORM entities

pub mod prelude;

pub mod feedback;
pub mod feedback_reply;
pub mod report;
pub mod version;
