pub mod display;
pub mod export;

pub use display::{render, render_list};
pub use export::write_table;
