pub mod draws;
pub mod engine;
pub mod paths;
