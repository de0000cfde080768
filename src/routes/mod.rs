pub mod auth;
pub mod conversation;
pub mod error;
pub mod health;
pub mod matches;
pub mod message;
pub mod profile;
pub mod response;
pub mod swipe;
