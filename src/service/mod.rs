pub mod auth;
pub mod conversation;
pub mod matches;
pub mod message;
pub mod profile;
pub mod session;
pub mod swipe;
