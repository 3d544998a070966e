pub mod data_manager;
pub mod db;
pub mod repositories;

pub use data_manager::DataManager;
