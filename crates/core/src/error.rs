//! Error taxonomy for the spacing engine.

use std::result;

use read_fonts::ReadError;
use write_fonts::BuilderError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse font: {0}")]
    Parse(#[from] ReadError),

    #[error("failed to build font: {0}")]
    Build(#[from] BuilderError),

    #[error("could not auto-detect a single OpenType language for this face")]
    LanguageAmbiguous,

    #[error("no GPOS adjustments are applicable to this face")]
    NoApplicableGlyphs,

    #[error("shaper is unavailable: {0}")]
    ShaperUnavailable(String),

    #[error("shaper timed out after {0:?}")]
    ShaperTimeout(std::time::Duration),

    #[error("glyph {0} has a malformed outline")]
    OutlineMalformed(u16),

    #[error("existing GPOS already defines {0:?} with an incompatible lookup")]
    GposConflict(font_types::Tag),

    #[error("existing GPOS contains a {0} lookup this engine cannot safely preserve")]
    GposUnsupportedLookup(&'static str),

    #[error("no cmap table in font")]
    NoCmap,

    #[error("no name table in font")]
    NoName,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = result::Result<T, Error>;
