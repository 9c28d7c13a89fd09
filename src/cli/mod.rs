pub mod convert;

pub use convert::{run_convert, ConvertOptions};
