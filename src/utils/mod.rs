pub mod text;
pub mod unpack;
