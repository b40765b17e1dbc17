//! # AMP Types
//!
//! Runtime value model for AMQP protocol constructors.
//!
//! This crate provides:
//! - The [`Value`] tree (scalars, strings, symbols, binaries, lists, maps
//!   and described values)
//! - [`Arg`] and [`VarArgs`], the heterogeneous keyword/value argument
//!   channel consumed by generated `*_kw` constructors
//! - The fatal diagnostic raised when a constructor sees an unknown keyword

pub mod args;
pub mod value;

pub use args::{Arg, FromArg, VarArgs, unrecognized_keyword};
pub use value::{Binary, Described, List, Map, Value};
