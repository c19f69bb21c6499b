pub mod auth;
pub mod family;
pub mod menu;
pub mod recipe;
pub mod share;
pub mod user;
