pub mod download;
pub mod session;
pub mod upload;

pub use session::TransferSession;
