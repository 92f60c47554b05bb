mod http;
mod server;
mod ws_handler;

pub use http::*;
pub use server::*;
pub use ws_handler::*;
