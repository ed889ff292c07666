pub mod extract;
pub mod format;
pub mod normalize;
