pub mod glob;
pub mod prototype;
pub mod script_fn;
