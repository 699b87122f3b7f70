pub mod crypto;
pub mod numeric;
pub mod token;
