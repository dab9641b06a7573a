pub mod catalog;
pub mod recommendations;
pub mod scoring;
