pub mod dto;
pub mod handler;
pub mod routes;

pub use routes::routes;
