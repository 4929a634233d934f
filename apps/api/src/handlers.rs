pub mod environments;
pub mod health;
pub mod logs;
pub mod notifications;
pub mod requests;
