pub mod auth;
pub mod families;
pub mod menu_items;
pub mod menus;
pub mod metrics;
pub mod recipes;
pub mod shares;
