pub mod conversation;
pub mod matches;
pub mod message;
pub mod postgres_repository;
pub mod profile;
pub mod session;
pub mod swipe;
pub mod user;
