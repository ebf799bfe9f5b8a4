pub mod dashboard;
pub mod meta;
pub mod records;
