pub mod boards;
pub mod cards;
pub mod tasks;
pub mod token;
