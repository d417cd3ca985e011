pub mod err;
pub mod gen;
