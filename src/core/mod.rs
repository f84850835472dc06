pub mod audience;
pub mod chat;
pub mod config;
pub mod emergency;
pub mod error;
pub mod feed;
pub mod model;
pub mod ordering;
pub mod roles;
pub mod store;
