pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod filter;
pub mod selection;
pub mod suggest;
pub mod widget;
