pub mod grid;
pub mod normalize;
pub mod selection;
pub mod session;
