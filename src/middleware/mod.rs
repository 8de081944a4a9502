// HTTP middleware

pub mod cors;

pub use cors::dynamic_cors_middleware;
