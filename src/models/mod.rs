pub mod common;
pub mod customer;
pub mod merchant;
