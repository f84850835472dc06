pub mod handler;
pub mod pipeline;
