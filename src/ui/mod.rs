pub mod app;
pub mod draw;
pub mod form;
pub mod terminal;
pub mod view;
