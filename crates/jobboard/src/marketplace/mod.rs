pub mod applications;
pub mod moderation;
pub mod notifications;
mod repository;

pub use repository::RepositoryError;
