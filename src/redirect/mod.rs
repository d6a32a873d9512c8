pub mod handlers;
mod routes;

pub use handlers::RedirectState;
pub use routes::create_redirect_router;
