mod app;
mod table_view;
mod themes;

pub use app::RegistryApp;
