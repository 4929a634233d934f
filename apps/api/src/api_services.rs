mod redis;
mod state_builder;
mod storage;

pub use state_builder::build_app_state;
