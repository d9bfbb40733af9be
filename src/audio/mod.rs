pub mod decode;
pub mod signal;
pub mod window;
