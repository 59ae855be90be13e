pub mod matrix;
pub mod svd;
pub mod strategy;
pub mod sweep;
pub mod cache;

pub use matrix::Matrix;
pub use svd::Svd;
