//! TeX types supported by Mathlang.

mod catcode;
mod mathclass;

pub use catcode::CatCode;
pub use mathclass::MathClass;
