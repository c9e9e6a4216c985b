pub mod markup;
pub mod state;

pub use markup::{extract_phone, parse_root_style_vars};
pub use state::extract_next_data;
