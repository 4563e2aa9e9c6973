//! Terminal output helpers

mod printer;
pub mod table;
mod tree;

pub use printer::{print_info, print_key_value, print_next_steps, print_success, print_warning};
pub use table::{truncate, validate_page_size};
pub use tree::render_tree;
