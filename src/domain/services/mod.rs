pub mod capacity;
pub mod exclusion;
pub mod registration;
