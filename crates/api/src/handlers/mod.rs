pub mod stores;
pub mod themes;
