//! The shaping capability: "given a face and a single code point under a
//! language, yield the glyph sequence" (spec.md §4.3, §6, §9).

use std::{
    io::{BufRead, BufReader, Write},
    process::{Child, ChildStdin, ChildStdout, Command, Stdio},
};

use read_fonts::types::GlyphId;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// A capability that shapes one code point under a face, script, and
/// language into a glyph sequence. Implementations may bind a native
/// library or spawn a child process; callers see only this trait.
pub trait Shaper {
    fn shape(
        &mut self,
        font_data: &[u8],
        face_index: u32,
        codepoint: u32,
        direction: Direction,
        script: &str,
        language: &str,
    ) -> Result<Vec<GlyphId>>;
}

/// In-process shaper backed by `rustybuzz`, the default binding.
pub struct RustybuzzShaper;

impl Shaper for RustybuzzShaper {
    fn shape(
        &mut self,
        font_data: &[u8],
        face_index: u32,
        codepoint: u32,
        direction: Direction,
        script: &str,
        language: &str,
    ) -> Result<Vec<GlyphId>> {
        let face = rustybuzz::Face::from_slice(font_data, face_index)
            .ok_or_else(|| Error::ShaperUnavailable("rustybuzz could not parse face".into()))?;

        let ch = char::from_u32(codepoint)
            .ok_or_else(|| Error::ShaperUnavailable(format!("invalid code point U+{codepoint:X}")))?;

        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(&ch.to_string());
        buffer.set_direction(match direction {
            Direction::Horizontal => rustybuzz::Direction::LeftToRight,
            Direction::Vertical => rustybuzz::Direction::TopToBottom,
        });
        if let Some(script) = rustybuzz::Script::from_iso15924_tag(
            rustybuzz::ttf_parser::Tag::from_bytes_lossy(script.as_bytes()),
        ) {
            buffer.set_script(script);
        }
        buffer.set_language(rustybuzz::Language::from_str(language).unwrap_or_default());

        let output = rustybuzz::shape(&face, &[], buffer);
        let glyphs = output
            .glyph_infos()
            .iter()
            .map(|info| GlyphId::new(info.glyph_id))
            .collect();
        Ok(glyphs)
    }
}

/// Out-of-process shaper. Spawns the binary named by the `SHAPER`
/// environment variable once and keeps it alive for the worker's
/// lifetime, writing one query per line to its stdin and reading one
/// response per line from its stdout.
///
/// Query format: `face_index codepoint direction script language\n`.
/// Response format: space-separated glyph IDs, or an empty line for none.
pub struct ExternalShaper {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl ExternalShaper {
    pub fn spawn(binary: &str) -> Result<Self> {
        let mut child = Command::new(binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| Error::ShaperUnavailable(format!("failed to spawn {binary}: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::ShaperUnavailable("shaper has no stdin".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::ShaperUnavailable("shaper has no stdout".into()))?;
        Ok(Self { child, stdin, stdout: BufReader::new(stdout) })
    }

    /// Construct from the `SHAPER` environment variable, if set.
    pub fn from_env() -> Result<Option<Self>> {
        match std::env::var("SHAPER") {
            Ok(path) if !path.is_empty() => Ok(Some(Self::spawn(&path)?)),
            _ => Ok(None),
        }
    }
}

impl Shaper for ExternalShaper {
    fn shape(
        &mut self,
        _font_data: &[u8],
        face_index: u32,
        codepoint: u32,
        direction: Direction,
        script: &str,
        language: &str,
    ) -> Result<Vec<GlyphId>> {
        let dir = match direction {
            Direction::Horizontal => "h",
            Direction::Vertical => "v",
        };
        writeln!(self.stdin, "{face_index} {codepoint:X} {dir} {script} {language}")
            .map_err(Error::Io)?;
        self.stdin.flush().map_err(Error::Io)?;

        let mut line = String::new();
        let n = self.stdout.read_line(&mut line).map_err(Error::Io)?;
        if n == 0 {
            return Err(Error::ShaperUnavailable("shaper closed its stdout".into()));
        }

        let glyphs = line
            .trim()
            .split_ascii_whitespace()
            .filter_map(|tok| tok.parse::<u32>().ok())
            .map(GlyphId::new)
            .collect();
        Ok(glyphs)
    }
}

impl Drop for ExternalShaper {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}
