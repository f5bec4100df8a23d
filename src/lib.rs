//! Split-view and floated-window layout engine.
//!
//! The engine drives an abstract [`window::WindowHost`]; the terminal
//! playground binary renders an in-memory host with `ratatui`.

pub mod actions;
pub mod animation;
pub mod config;
pub mod constants;
pub mod debug_log;
pub mod desks;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod float;
pub mod geometry;
pub mod keybindings;
pub mod layout;
pub mod observer;
pub mod playground;
pub mod split_view;
pub mod tracing_sub;
pub mod ui;
pub mod window;
