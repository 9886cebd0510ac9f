//! Command line driver for the FIRRTL frontend.
pub mod cmdline;
pub mod driver;
