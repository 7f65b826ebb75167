pub mod contracts;
pub mod customers;
pub mod execution;
pub mod market;
pub mod roles;
pub mod series;
pub mod settlement;
pub mod weather;
