pub mod files;

pub use files::{list_json_files, processed_output_path, read_document, read_json_value, write_document};
