//! Report rendering.

mod pdf;

pub use pdf::render_pdf;
