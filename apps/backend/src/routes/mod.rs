pub mod auth;
pub mod lessons;
pub mod steps;
pub mod users;
