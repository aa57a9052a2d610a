use anyhow::{Context, Result};
use compass::{
    catalog,
    edinet::{ArtifactFormat, FilingList, StatementType},
    process::DirSource,
    storage::FsStore,
    BatchRunner, CompassConfig, FilingProcessor, Publisher,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "compass-batch",
    about = "Extract financial statements from unpacked EDINET filings"
)]
struct Opt {
    /// Document-list JSON (defaults to <input-dir>/documents.json)
    #[structopt(long, parse(from_os_str))]
    list: Option<PathBuf>,

    /// Directory holding <docID>.xbrl documents
    #[structopt(long, parse(from_os_str))]
    input_dir: Option<PathBuf>,

    /// Root directory artifacts are published under
    #[structopt(long, parse(from_os_str))]
    artifact_root: Option<PathBuf>,

    /// Where per-filing scratch directories are created
    #[structopt(long, parse(from_os_str))]
    scratch_dir: Option<PathBuf>,

    #[structopt(long)]
    max_concurrent: Option<usize>,

    #[structopt(long)]
    timeout_secs: Option<u64>,

    #[structopt(long)]
    store_retries: Option<usize>,

    /// List published artifacts of this filer code instead of processing
    #[structopt(long)]
    catalog: Option<String>,

    /// Statement listed by --catalog (BS, PL, CF, Fundamentals)
    #[structopt(long, default_value = "BS")]
    statement: StatementType,

    /// Artifact format listed by --catalog (json, html)
    #[structopt(long, default_value = "json")]
    format: ArtifactFormat,
}

impl Opt {
    fn overrides(&self) -> HashMap<&'static str, String> {
        let mut vars = HashMap::new();
        if let Some(dir) = &self.input_dir {
            vars.insert("COMPASS_INPUT_DIR", dir.display().to_string());
        }
        if let Some(root) = &self.artifact_root {
            vars.insert("COMPASS_ARTIFACT_ROOT", root.display().to_string());
        }
        if let Some(n) = self.max_concurrent {
            vars.insert("COMPASS_MAX_CONCURRENT_FILINGS", n.to_string());
        }
        if let Some(secs) = self.timeout_secs {
            vars.insert("COMPASS_FILING_TIMEOUT_SECS", secs.to_string());
        }
        if let Some(n) = self.store_retries {
            vars.insert("COMPASS_STORE_RETRIES", n.to_string());
        }
        vars
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let opt = Opt::from_args();

    CompassConfig::load_local_env();
    let overrides = opt.overrides();
    let config = CompassConfig::from_lookup(|name| {
        overrides
            .get(name)
            .cloned()
            .or_else(|| std::env::var(name).ok())
    })
    .context("Failed to load configuration")?;
    log::debug!("{:?}", config);

    if let Some(filer_code) = &opt.catalog {
        let store = FsStore::new(&config.artifact_root);
        let reports = catalog::list_reports(&store, filer_code, opt.statement, opt.format).await?;
        for (key, body) in &reports {
            println!("{} ({} bytes)", key, body.len());
        }
        log::info!("{} {} artifacts for {}", reports.len(), opt.statement, filer_code);
        return Ok(());
    }

    let list_path = opt
        .list
        .clone()
        .unwrap_or_else(|| config.input_dir.join("documents.json"));
    let list: FilingList = serde_json::from_slice(
        &std::fs::read(&list_path)
            .with_context(|| format!("Failed to read {}", list_path.display()))?,
    )
    .with_context(|| format!("Failed to parse {}", list_path.display()))?;

    let total = list.results.len();
    let entries: Vec<_> = list
        .results
        .into_iter()
        .filter(|entry| entry.is_securities_report())
        .collect();
    log::info!(
        "{} of {} listed documents are securities reports",
        entries.len(),
        total
    );

    let store = Arc::new(FsStore::new(&config.artifact_root));
    let publisher = Publisher::new(store, config.store_retries);
    let scratch_dir = opt
        .scratch_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("compass"));
    let processor = Arc::new(FilingProcessor::new(publisher, scratch_dir));
    let source = Arc::new(DirSource::new(&config.input_dir));

    let runner = BatchRunner::new(processor, source, &config);
    let report = runner.process_filings(entries).await;

    println!("{}", report);
    Ok(())
}
