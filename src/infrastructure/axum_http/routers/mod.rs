pub mod admin;
pub mod auth;
pub mod movies;
pub mod payment_webhook;
pub mod subscriptions;
pub mod users;
pub mod watchlists;
