pub mod document;
pub mod signer;
pub mod transport;
