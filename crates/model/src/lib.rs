#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod catalog;
mod question;

pub use catalog::catalog;
pub use question::Question;
