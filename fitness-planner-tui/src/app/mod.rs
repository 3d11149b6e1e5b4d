// src/app/mod.rs
mod input;
pub mod state;
mod worker;

pub use state::{ActiveModal, App, FocusedField};
