pub mod title_generation;

pub use title_generation::TitleGenerator;
