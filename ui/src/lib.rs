#![warn(clippy::all, rust_2018_idioms)]
//! Desktop shell of the Shoebox media library: login, the thumbnail gallery, uploads and the
//! lightbox, all driven by `shoebox-business`.

pub mod app;
pub mod pages;
pub mod state;
pub mod tasks;
pub mod utils;
pub mod widgets;

pub use app::ShoeboxApp;
