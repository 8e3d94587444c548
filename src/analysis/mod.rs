pub mod color;
pub mod composition;
pub mod core;
pub mod engagement;
pub mod faces;
pub mod insight;
pub mod overlay;
pub mod text;
