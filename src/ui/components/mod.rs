//! Reusable UI components for the mixer panel.

pub mod session_row;

pub use session_row::SessionRow;
