pub mod material;
pub mod renderable;
