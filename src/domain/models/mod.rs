pub mod application;
pub mod block;
pub mod program;
pub mod subevent;
