pub mod movies;
pub mod payments;
pub mod plans;
pub mod reviews;
pub mod subscriptions;
pub mod users;
pub mod watchlist_items;
