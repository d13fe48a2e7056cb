pub mod health;
pub mod partition;
pub mod plan;
