pub mod compression;
pub mod crypto;
pub mod error;
pub mod frame;

pub use error::Error;
pub use frame::Frame;
