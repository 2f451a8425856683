pub mod errors;
pub mod extract;
pub mod gate;
pub mod openapi;
pub mod routes;
pub mod startup;

pub use routes::{build_router, ServerState};
pub use startup::run;
