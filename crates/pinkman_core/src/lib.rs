pub mod input;
pub mod mask;
pub mod rect;
pub mod sprites;
pub mod time;
