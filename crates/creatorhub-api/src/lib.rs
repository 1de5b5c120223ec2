pub mod assist;
pub mod creators;
pub mod error;
pub mod events;
pub mod messages;
pub mod posts;
pub mod routes;
pub mod state;
pub mod users;

pub use routes::router;
pub use state::{AppState, AppStateInner};
