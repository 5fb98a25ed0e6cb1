pub mod add;
pub mod aggregate;
pub mod filter;
