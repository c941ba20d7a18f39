use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;

use kubemodel_core::adapter::GeneratorAdapter;
use kubemodel_core::config::{self, CONFIG_FILE_NAME, KubemodelConfig, SourceKind};
use kubemodel_core::extract::{BucketStrategy, Extractor};
use kubemodel_core::fetch::SchemaSource;
use kubemodel_core::pipeline::Orchestrator;
use kubemodel_fetch::{ClusterSource, GithubSource};
use kubemodel_pydantic::PydanticGenerator;

#[derive(Parser)]
#[command(
    name = "kubemodel",
    about = "Generate Pydantic models from Kubernetes OpenAPI v3 schemas",
    version
)]
struct Cli {
    /// Default log filter; RUST_LOG still overrides it per module
    #[arg(short, long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Directory generated models are written to
    #[arg(short, long)]
    output_path: Option<PathBuf>,

    /// Directory merged schemas are cached in
    #[arg(short, long)]
    specs_path: Option<PathBuf>,

    /// Config file to read
    #[arg(long, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Where to read schemas from
    #[arg(long, value_enum)]
    source: Option<SourceArg>,

    /// API server URL for the cluster source
    #[arg(long)]
    server: Option<String>,

    /// Release tag or branch for the github source
    #[arg(long)]
    k8s_version: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    Cluster,
    Github,
}

impl From<SourceArg> for SourceKind {
    fn from(source: SourceArg) -> Self {
        match source {
            SourceArg::Cluster => SourceKind::Cluster,
            SourceArg::Github => SourceKind::Github,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.into())
        .parse_default_env()
        .init();

    let cfg = resolve_config(&cli)?;
    let models_dir = PathBuf::from(&cfg.output_path);
    let specs_dir = PathBuf::from(&cfg.specs_path);

    let written = match cfg.source.kind {
        SourceKind::Cluster => {
            let source = ClusterSource::new(&cfg.source.cluster, &cfg.timeouts)
                .context("failed to configure cluster source")?;
            log::info!("Reading schemas from {}", source.server());
            run(Extractor::new(source, BucketStrategy::ByTitle), &models_dir, &specs_dir)?
        }
        SourceKind::Github => {
            let github = &cfg.source.github;
            log::info!(
                "Reading schemas from {}/{} at {}",
                github.owner,
                github.repo,
                github.version
            );
            let source = GithubSource::new(github, &cfg.timeouts);
            run(Extractor::for_release(source), &models_dir, &specs_dir)?
        }
    };

    log::info!(
        "Generated {} files in {}",
        written.len(),
        models_dir.display()
    );
    Ok(())
}

/// Config file values with command-line flags applied on top. A missing
/// config file means built-in defaults.
fn resolve_config(cli: &Cli) -> Result<KubemodelConfig> {
    let mut cfg = config::load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?
        .unwrap_or_default();

    if let Some(path) = &cli.output_path {
        cfg.output_path = path.display().to_string();
    }
    if let Some(path) = &cli.specs_path {
        cfg.specs_path = path.display().to_string();
    }
    if let Some(source) = cli.source {
        cfg.source.kind = source.into();
    }
    if let Some(server) = &cli.server {
        cfg.source.cluster.server = server.clone();
    }
    if let Some(version) = &cli.k8s_version {
        cfg.source.github.version = version.clone();
    }
    Ok(cfg)
}

fn run<S: SchemaSource>(
    extractor: Extractor<S>,
    models_dir: &Path,
    specs_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let orchestrator = Orchestrator::new(extractor, GeneratorAdapter::new(PydanticGenerator));
    orchestrator
        .generate(models_dir, specs_dir)
        .with_context(|| format!("failed to generate models into {}", models_dir.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("kubemodel").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(CONFIG_FILE_NAME);
        let cli = parse(&["--config", missing.to_str().unwrap()]);

        assert_eq!(cli.log_level, LogLevel::Info);
        assert_eq!(resolve_config(&cli).unwrap(), KubemodelConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "output_path: from_file\nspecs_path: cache\nsource:\n  kind: github\n",
        )
        .unwrap();

        let cli = parse(&[
            "--config",
            path.to_str().unwrap(),
            "-o",
            "models",
            "--k8s-version",
            "v1.30.2",
            "-l",
            "debug",
        ]);
        let cfg = resolve_config(&cli).unwrap();

        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cfg.output_path, "models");
        assert_eq!(cfg.specs_path, "cache");
        assert_eq!(cfg.source.kind, SourceKind::Github);
        assert_eq!(cfg.source.github.version, "v1.30.2");
    }

    #[test]
    fn test_source_and_server_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "source:\n  kind: github\n").unwrap();

        let cli = parse(&[
            "--config",
            path.to_str().unwrap(),
            "--source",
            "cluster",
            "--server",
            "https://10.0.0.1:6443",
        ]);
        let cfg = resolve_config(&cli).unwrap();
        assert_eq!(cfg.source.kind, SourceKind::Cluster);
        assert_eq!(cfg.source.cluster.server, "https://10.0.0.1:6443");
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "timeouts: [").unwrap();

        let cli = parse(&["--config", path.to_str().unwrap()]);
        let err = resolve_config(&cli).unwrap_err();
        assert!(err.to_string().contains("failed to load"));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        assert!(Cli::try_parse_from(["kubemodel", "--log-level", "loud"]).is_err());
    }
}
