pub mod dataset;
pub mod error;
pub mod ingest;
pub mod parameter;
pub mod reading;
pub mod source;
pub mod threshold;
