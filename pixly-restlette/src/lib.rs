mod error;
mod routes;

pub use error::ApiError;
pub use routes::build_restlette_router;
