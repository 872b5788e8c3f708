pub mod blob;
pub mod compiler;
pub mod instruction;
