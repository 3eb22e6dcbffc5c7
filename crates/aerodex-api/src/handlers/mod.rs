pub mod airports;
pub mod sync;
