pub mod attendance;
pub mod registration;
