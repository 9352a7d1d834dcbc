pub mod figure;
pub mod gallery;

pub use figure::{Figure, FigureConfig, random_color};
pub use gallery::Gallery;
