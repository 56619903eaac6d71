pub mod app;
pub mod debounce;
pub mod form;
pub mod notification;
pub mod pager;
pub mod todo_list_renderer;
