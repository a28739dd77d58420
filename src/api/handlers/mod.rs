pub mod admin;
pub mod block;
pub mod health;
pub mod schedule;
pub mod subevent;
