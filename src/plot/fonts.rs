//! Font discovery and registration for chart text
//!
//! Text is rasterized in pure Rust, so a font file has to be found and
//! registered before captions or axis labels can be drawn.

use anyhow::{anyhow, Context};
use plotters::style::{register_font, FontStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Family name every chart text style refers to
pub const FONT_FAMILY: &str = "sans-serif";

/// Well-known locations of a regular sans-serif font
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED_FONT: OnceLock<PathBuf> = OnceLock::new();

/// First existing file among the well-known font locations
pub fn discover_system_font() -> Option<PathBuf> {
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

/// Font registered for this process, if any
pub fn registered_font() -> Option<&'static Path> {
    REGISTERED_FONT.get().map(PathBuf::as_path)
}

/// Register `path` as the chart font
///
/// The font table is process-global, so only the first successful
/// registration takes effect; later calls return the font already in use.
pub fn register_chart_font(path: &Path) -> anyhow::Result<&'static Path> {
    if let Some(existing) = registered_font() {
        return Ok(existing);
    }

    let bytes = read_font(path)?;
    register_bytes(path, bytes)?;

    Ok(REGISTERED_FONT.get_or_init(|| path.to_path_buf()).as_path())
}

/// Read a font file into memory that lives for the rest of the process
fn read_font(path: &Path) -> anyhow::Result<&'static [u8]> {
    let bytes = fs::read(path)
        .with_context(|| format!("reading font file '{}'", path.display()))?;
    // plotters keeps a borrowed reference for the rest of the process
    Ok(Box::leak(bytes.into_boxed_slice()))
}

fn register_bytes(path: &Path, bytes: &'static [u8]) -> anyhow::Result<()> {
    register_font(FONT_FAMILY, FontStyle::Normal, bytes)
        .map_err(|_| anyhow!("'{}' is not a usable TrueType/OpenType font", path.display()))
}
