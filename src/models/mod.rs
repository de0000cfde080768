pub mod conversation;
pub mod health;
pub mod matches;
pub mod message;
pub mod pagination;
pub mod profile;
pub mod session;
pub mod swipe;
pub mod user;
