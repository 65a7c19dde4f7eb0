pub mod pipeline;

pub use pipeline::{create_record, update_record, ContentResource, Submission};
