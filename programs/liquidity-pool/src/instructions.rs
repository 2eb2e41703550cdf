#![allow(ambiguous_glob_reexports)]

pub mod curve;
pub mod deposit;
pub mod swap;
pub mod withdraw;

pub use curve::*;
pub use deposit::*;
pub use swap::*;
pub use withdraw::*;
