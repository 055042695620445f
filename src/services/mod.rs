pub mod catalog;
pub mod cleaning;
pub mod recommendations;
pub mod similarity;
