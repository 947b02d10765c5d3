pub mod feedback;
pub mod report;
