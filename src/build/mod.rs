//! The index builder: walks an input directory of XML documents (§6),
//! drives pass 1 (§4.3) and the serializer + pass 2 (§4.4, §4.5), and
//! reports progress the way the teacher's own `build::run_build` does.

mod builder;
mod serializer;

pub use builder::IndexBuilder;
pub use serializer::BuildStats;

use crate::error::BuildError;
use std::path::Path;
use std::time::Instant;

/// Knobs for a single `build_index` run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub output_basename: std::path::PathBuf,
    pub threads: usize,
    pub show_progress: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            output_basename: std::path::PathBuf::from("ifile"),
            threads: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4),
            show_progress: true,
        }
    }
}

/// Walk `input_dir` for XML documents, run the two-pass build, and write
/// the four on-disk artifacts. Returns the resulting vocabulary/document
/// counts.
pub fn build_index(input_dir: &Path, config: &BuildConfig) -> Result<BuildStats, BuildError> {
    let paths = collect_xml_paths(input_dir)?;

    let builder = IndexBuilder::new(config.threads);
    builder.open()?;

    let progress = make_progress_bar(paths.len() as u64, config.show_progress);
    for path in paths {
        builder.index_document(path)?;
        progress.tick();
    }
    let (dictionary, corpus) = builder.close()?;
    progress.finish("pass 1 complete");

    let started = Instant::now();
    let stats = serializer::serialize(&config.output_basename, dictionary, corpus, config.threads)?;
    eprintln!(
        "ifile: indexed {} document(s), {} term(s) in {:.2}s",
        stats.document_count,
        stats.vocabulary_size,
        started.elapsed().as_secs_f64()
    );
    Ok(stats)
}

fn collect_xml_paths(input_dir: &Path) -> Result<Vec<std::path::PathBuf>, BuildError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(feature = "parallel")]
struct Progress(Option<indicatif::ProgressBar>);

#[cfg(feature = "parallel")]
fn make_progress_bar(len: u64, show: bool) -> Progress {
    if !show {
        return Progress(None);
    }
    let bar = indicatif::ProgressBar::new(len);
    bar.set_style(
        indicatif::ProgressStyle::with_template(
            "{spinner:.cyan} indexing [{bar:40.cyan/dim}] {pos}/{len} {msg}",
        )
        .expect("valid progress template"),
    );
    Progress(Some(bar))
}

#[cfg(feature = "parallel")]
impl Progress {
    fn tick(&self) {
        if let Some(bar) = &self.0 {
            bar.inc(1);
        }
    }

    fn finish(&self, msg: &'static str) {
        if let Some(bar) = &self.0 {
            bar.finish_with_message(msg);
        }
    }
}

#[cfg(not(feature = "parallel"))]
struct Progress;

#[cfg(not(feature = "parallel"))]
fn make_progress_bar(_len: u64, _show: bool) -> Progress {
    Progress
}

#[cfg(not(feature = "parallel"))]
impl Progress {
    fn tick(&self) {}
    fn finish(&self, _msg: &'static str) {}
}
