pub mod excel;

pub use excel::{export_contacts, export_file_name, today};
