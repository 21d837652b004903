pub mod app;
pub mod entities;
