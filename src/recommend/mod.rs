pub mod budget;
pub mod diversity;
pub mod dto;
pub mod generator;
pub mod handlers;
pub mod scorer;
pub mod service;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
