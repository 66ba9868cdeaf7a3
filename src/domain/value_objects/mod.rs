pub mod enums;
pub mod movies;
pub mod plans;
pub mod reviews;
pub mod subscriptions;
pub mod users;
pub mod watchlists;
