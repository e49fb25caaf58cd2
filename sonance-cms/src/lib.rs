//! A barebones client for the song catalog content API.
#![deny(missing_docs)]

mod client;
pub use client::*;

mod song;
pub use song::*;

mod misc;

mod request;
