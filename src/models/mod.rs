pub mod chat;
pub mod concept;
pub mod image;
pub mod report;

pub use chat::*;
pub use concept::*;
pub use image::*;
pub use report::*;
