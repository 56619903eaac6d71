pub mod api;
pub mod dtos;
pub(crate) mod errors;
pub mod todo_service;
mod todos_handler;
pub mod validation;
