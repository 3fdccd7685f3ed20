pub mod enums;
pub mod forum;
pub mod post;
pub mod thread;
pub mod user;
pub mod vote;
