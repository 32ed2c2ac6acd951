pub mod hash;
pub mod source;
pub mod tree;
