pub mod packerjs;
pub mod unbaser;
