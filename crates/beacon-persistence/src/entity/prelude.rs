pub use super::feedback::Entity as Feedback;
pub use super::feedback_reply::Entity as FeedbackReply;
pub use super::report::Entity as Report;
pub use super::version::Entity as Version;
