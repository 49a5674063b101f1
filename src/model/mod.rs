//! Database model building

mod builder;
mod database_object;
mod elements;
mod parameters;

pub use builder::{analyze, extract_object_information, fold, FoldedObjects};
pub use database_object::{Bucket, DatabaseObject, DatabaseProperties};
pub use elements::*;
pub use parameters::{extract_parameters, scan_parameters};
