mod cursor;
mod position;

pub use cursor::*;
pub use position::*;
