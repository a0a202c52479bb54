pub mod buffer;
pub mod object_buffer;
pub mod texture;

pub use object_buffer::{ObjectBuffer, ObjectUniform};
