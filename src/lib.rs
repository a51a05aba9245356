pub mod access;
pub mod aggregate;
pub mod catalog;
pub mod expression;
