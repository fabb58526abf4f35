pub mod columns;
pub mod dates;
pub mod pipeline;
pub mod reader;
pub mod types;

pub use pipeline::load_table;
