//! Glues discovery -> per-face core `Pipeline` -> FeatureTester -> glyph
//! sidecar -> TTC re-serialization -> output writing (spec.md §6).

use std::{
    cell::RefCell,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use east_asian_spacing_core::{
    config::{Config, Language},
    feature_tester::FeatureTester,
    pair_classifier::GlyphSet,
    pipeline::{Outcome, Pipeline},
    shaper::{ExternalShaper, RustybuzzShaper, Shaper},
};
use log::{info, warn};

use crate::{
    cli::BuildArgs,
    discover::discover_fonts,
    glyphs_dump::write_sidecar,
    io::{ensure_parent_dir, read_font, write_font},
    noto,
    parallel::{BatchResult, collect_parallel},
    ttc,
};

/// Faces within one TTC are processed sequentially (spec.md §5: each
/// face's GposBuilder must finish before re-serialization begins, and
/// TTC merge order is native face order, not completion order), but
/// the files given on the command line are independent of each other,
/// so they fan out across `rayon::par_iter` the same way the rest of
/// this codebase's batch operations do.
pub fn run_build(args: BuildArgs, is_noto: bool) -> Result<()> {
    let files = discover_fonts(&args.inputs)?;
    if files.is_empty() {
        bail!("no font files found among the given inputs");
    }

    let results = collect_parallel(&files, |path| {
        if is_noto && noto::is_mono_variant(path) {
            info!("skipping monospace variant: {}", path.display());
            return Ok(None);
        }
        process_file(path, &args, is_noto)
    });

    let mut batch = BatchResult::default();
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(out_path) => {
                batch.succeeded += 1;
                if args.path_out {
                    if let Some(out_path) = out_path {
                        println!("{}\t{}", path.display(), out_path.display());
                    }
                }
            }
            Err(e) => {
                warn!("failed to process {}: {e:#}", path.display());
                batch.failed += 1;
            }
        }
    }

    batch.ok_or_bail("build")
}

thread_local! {
    /// One shaper per `rayon` worker thread (spec.md §5, §6: the `SHAPER`
    /// binary, if set, is spawned once per worker and kept alive for its
    /// lifetime rather than once per file). Lazily initialized on first
    /// use so a run that never touches a face with candidates never
    /// spawns a child process at all.
    static WORKER_SHAPER: RefCell<Option<Box<dyn Shaper>>> = RefCell::new(None);
}

/// Run `f` against this worker thread's shaper, spawning it from the
/// `SHAPER` environment variable on first use (falling back to the
/// in-process `rustybuzz` binding when unset).
fn with_worker_shaper<R>(f: impl FnOnce(&mut dyn Shaper) -> R) -> Result<R> {
    WORKER_SHAPER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            let shaper: Box<dyn Shaper> = match ExternalShaper::from_env()? {
                Some(external) => Box::new(external),
                None => Box::new(RustybuzzShaper),
            };
            *slot = Some(shaper);
        }
        Ok(f(slot.as_mut().expect("just initialized above").as_mut()))
    })
}

/// Returns `Some(output path)` if a file was written, `None` if the face
/// had no applicable adjustments and nothing needed to change (but the
/// input was still logically "processed" successfully).
fn process_file(path: &Path, args: &BuildArgs, is_noto: bool) -> Result<Option<PathBuf>> {
    let data = read_font(path)?;
    let face_plan = resolve_face_plan(path, args, is_noto, &data)?;

    let out_path = args.out_dir.join(path.file_name().context("input path has no file name")?);

    if face_plan.is_empty() {
        ensure_parent_dir(&out_path)?;
        write_font(&out_path, &data)?;
        return Ok(Some(out_path));
    }

    let mut output_faces: Vec<Vec<u8>> = Vec::new();
    let total_faces = ttc::face_count(&data)?;

    for face_index in 0..total_faces {
        let language = face_plan
            .iter()
            .find(|(idx, _)| *idx == face_index)
            .map(|(_, lang)| *lang);

        let Some(language) = language else {
            // Face not selected for processing; copy its bytes unchanged
            // by re-opening and re-serializing with no GPOS replacement.
            let (_, raw) = ttc::open_face(&data, face_index)?;
            output_faces.push(copy_face_unchanged(&raw)?);
            continue;
        };

        let (font, raw) = ttc::open_face(&data, face_index)?;
        let config = Config::new(language).vertical(font.has_vertical_metrics()).test_level(args.test);

        match with_worker_shaper(|shaper| Pipeline::run_with_shaper(&font, &config, shaper))? {
            Ok(Outcome::Adjusted { gpos, horizontal, vertical, half_em, .. }) => {
                info!("{}: face {face_index} adjusted ({language:?})", path.display());
                let output = ttc::rewrite_with_gpos(&raw, &gpos)?;

                if config.get_test_level() > 0 {
                    // `output` is a standalone single-face sfnt (the TTC
                    // packing step, if any, happens after this loop), so
                    // it is always face index 0 regardless of this face's
                    // index within the source collection.
                    run_feature_tests(&font, &output, 0, &horizontal, half_em, &config, path);
                }

                if let Some(glyphs_dir) = &args.glyphs {
                    std::fs::create_dir_all(glyphs_dir)?;
                    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("font");
                    let sidecar_path = glyphs_dir.join(format!("{stem}-face{face_index}-glyphs.txt"));
                    write_sidecar(&sidecar_path, &horizontal, vertical.as_ref())?;
                }

                output_faces.push(output);
            }
            Ok(Outcome::Unchanged { reason }) => {
                warn!("{}: face {face_index} unchanged: {reason}", path.display());
                output_faces.push(copy_face_unchanged(&raw)?);
            }
            Err(e) => return Err(e.into()),
        }
    }

    ensure_parent_dir(&out_path)?;
    // A single face needs no collection wrapper; several faces are
    // re-packed into one `.ttc`/`.otc` with shared-table dedup so Noto
    // CJK-style families don't bloat ~4x on write (spec.md §9).
    let packed = ttc::build_ttc(&output_faces)?;
    write_font(&out_path, &packed)?;
    Ok(Some(out_path))
}

fn copy_face_unchanged(raw: &read_fonts::FontRef) -> Result<Vec<u8>> {
    use read_fonts::TableProvider;
    use write_fonts::FontBuilder;

    let mut builder = FontBuilder::new();
    for record in raw.table_directory.table_records() {
        let tag = record.tag();
        if let Some(data) = raw.table_data(tag) {
            builder.add_raw(tag, data);
        }
    }
    Ok(builder.build())
}

fn resolve_face_plan(
    path: &Path,
    args: &BuildArgs,
    is_noto: bool,
    data: &[u8],
) -> Result<Vec<(u32, Language)>> {
    if is_noto {
        if let Some(plan) = noto::derive_index_and_language(path) {
            return Ok(plan);
        }
    }

    let total_faces = ttc::face_count(data)?;
    let indices: Vec<u32> = match &args.index {
        Some(indices) => indices.clone(),
        None => (0..total_faces).collect(),
    };

    let languages: Vec<Language> = match &args.language {
        Some(tags) => tags.iter().map(|s| parse_language(s)).collect::<Result<_>>()?,
        None => vec![Language::Auto; indices.len()],
    };

    if languages.len() != indices.len() && languages.len() != 1 {
        bail!("--language count must match --index count, or be a single value");
    }

    Ok(indices
        .into_iter()
        .enumerate()
        .map(|(i, idx)| {
            let lang = if languages.len() == 1 { languages[0] } else { languages[i] };
            (idx, lang)
        })
        .collect())
}

fn parse_language(tag: &str) -> Result<Language> {
    match tag.trim().to_ascii_uppercase().as_str() {
        "JAN" => Ok(Language::Jan),
        "KOR" => Ok(Language::Kor),
        "ZHS" => Ok(Language::Zhs),
        "ZHT" => Ok(Language::Zht),
        "AUTO" | "" => Ok(Language::Auto),
        other => bail!("unrecognized language tag: {other}"),
    }
}

/// Plan and run the post-build shaping battery against the freshly
/// written face bytes, logging (non-fatally) any mismatch against the
/// shaped-advance law (spec.md §4.6, §8 property 4). A failure here
/// never discards the output file that was already produced.
fn run_feature_tests(
    font: &east_asian_spacing_core::Font<'_>,
    output: &[u8],
    face_index: u32,
    horizontal: &GlyphSet,
    half_em: i16,
    config: &Config,
    path: &Path,
) {
    let advance_of = |glyph_id| font.horizontal_advance(glyph_id).unwrap_or(0) as i32;
    let checks = FeatureTester::plan(horizontal, advance_of, half_em as i32, config.get_test_level());
    if checks.is_empty() {
        return;
    }
    match FeatureTester::run(output, face_index, &checks) {
        Ok(report) if !report.passed() => {
            warn!(
                "{}: face {face_index} failed {}/{} feature checks",
                path.display(),
                report.failures.len(),
                report.checked
            );
        }
        Ok(_) => {}
        Err(e) => warn!("{}: face {face_index} could not run feature checks: {e}", path.display()),
    }
}
