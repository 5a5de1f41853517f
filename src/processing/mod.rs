pub mod harvest;
pub mod search;
