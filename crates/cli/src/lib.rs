//! East Asian spacing CLI: font discovery, TTC walking, and the build
//! pipeline surrounding the `east-asian-spacing-core` engine.

pub mod cli;
pub mod diff;
pub mod discover;
pub mod glyphs_dump;
pub mod io;
pub mod noto;
pub mod parallel;
pub mod pipeline;
pub mod ttc;
