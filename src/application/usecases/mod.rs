pub mod access_gate;
pub mod auth;
pub mod entitlements;
pub mod movies;
pub mod purchases;
pub mod users;
pub mod watchlists;
