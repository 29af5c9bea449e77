pub mod errors;
pub mod routes;
pub mod state;
