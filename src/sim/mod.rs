pub mod mazegen;
pub mod world;
