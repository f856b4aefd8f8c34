//! Bulk import binary - loads a JSON file into the content store
//!
//! Usage:
//!   cargo run --bin cms-import -- countries data/countries.json
//!   cargo run --bin cms-import -- bundle data/seed.json
//!
//! The first argument is an import kind (`countries`, `cities`,
//! `destinations`, `destination_translations`, `pages`, `blog_categories`,
//! `blog_posts`, `blog_post_translations`, `homepage_categories`,
//! `navigation_items`, `footer_blocks`) or `bundle` for an object keyed by
//! kind.
//!
//! Environment variables:
//! - DATABASE_URL (without it the file is imported into a throwaway
//!   in-memory store, which only validates it)
//! - MAX_IMPORT_BYTES (defaults to 5 MiB)

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use travel_cms::config::Config;
use travel_cms::i18n::LocaleRegistry;
use travel_cms::import::{ImportKind, ImportReport, Importer};
use travel_cms::store::{ContentStore, MemoryStore, PgStore};

/// What to import.
#[derive(Debug, PartialEq)]
enum Target {
    Kind(ImportKind),
    Bundle,
}

/// Parsed command line.
#[derive(Debug, PartialEq)]
struct Args {
    target: Target,
    file: PathBuf,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let [target, file] = args else {
        anyhow::bail!("Usage: cms-import <kind|bundle> <file.json>");
    };

    let target = if target == "bundle" {
        Target::Bundle
    } else {
        Target::Kind(target.parse()?)
    };

    Ok(Args {
        target,
        file: PathBuf::from(file),
    })
}

/// Read the payload file
fn load_payload(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        anyhow::bail!("Import file not found at {}", path.display());
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_report(kind: ImportKind, report: &ImportReport) {
    info!(
        "{}: {} created, {} updated, {} skipped",
        kind, report.created, report.updated, report.skipped
    );
    for error in &report.errors {
        warn!("{}: {}", kind, error);
    }
}

async fn run<S: ContentStore>(store: &S, config: &Config, args: &Args) -> Result<usize> {
    let registry = LocaleRegistry::standard();
    let importer = Importer::new(store, &registry, config.max_import_bytes);
    let payload = load_payload(&args.file)?;

    let reports = match args.target {
        Target::Kind(kind) => vec![(kind, importer.import_json(kind, &payload).await?)],
        Target::Bundle => importer.import_bundle(&payload).await?,
    };

    let mut skipped = 0;
    for (kind, report) in &reports {
        print_report(*kind, report);
        skipped += report.skipped;
    }
    Ok(skipped)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("travel_cms=info".parse()?)
                .add_directive("cms_import=info".parse()?),
        )
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&raw)?;
    let config = Config::from_env()?;

    info!("Importing {}", args.file.display());

    let skipped = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections)
                .await
                .context("Failed to connect to database")?;
            store.migrate().await.context("Failed to run migrations")?;
            run(&store, &config, &args).await?
        }
        None => {
            warn!("DATABASE_URL not set, validating against an in-memory store");
            run(&MemoryStore::new(), &config, &args).await?
        }
    };

    if skipped > 0 {
        anyhow::bail!("{} item(s) were skipped", skipped);
    }

    info!("Import complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn test_config() -> Config {
        Config {
            database_url: None,
            database_max_connections: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: "*".to_string(),
            public_base_url: None,
            frontend_base_url: "http://localhost:3000".to_string(),
            seed_file: None,
            max_import_bytes: 64 * 1024,
        }
    }

    // ==================== Argument Tests ====================

    #[test]
    fn test_parse_args_kind() {
        let parsed = parse_args(&args(&["countries", "data/countries.json"])).unwrap();
        assert_eq!(parsed.target, Target::Kind(ImportKind::Countries));
        assert_eq!(parsed.file, PathBuf::from("data/countries.json"));
    }

    #[test]
    fn test_parse_args_bundle() {
        let parsed = parse_args(&args(&["bundle", "seed.json"])).unwrap();
        assert_eq!(parsed.target, Target::Bundle);
    }

    #[test]
    fn test_parse_args_rejects_unknown_kind() {
        let err = parse_args(&args(&["planets", "x.json"])).unwrap_err();
        assert!(err.to_string().contains("Unknown import kind"));
    }

    #[test]
    fn test_parse_args_requires_two_arguments() {
        assert!(parse_args(&args(&["countries"])).is_err());
        assert!(parse_args(&args(&[])).is_err());
    }

    // ==================== File Tests ====================

    #[test]
    fn test_load_payload_missing_file() {
        let err = load_payload(Path::new("/nonexistent/import.json")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_run_imports_file_into_store() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"slug": "portugal", "name": "Portugal"}}, {{"slug": "bad slug!", "name": "X"}}]"#
        )
        .unwrap();

        let store = MemoryStore::new();
        let parsed = Args {
            target: Target::Kind(ImportKind::Countries),
            file: file.path().to_path_buf(),
        };

        let skipped = run(&store, &test_config(), &parsed).await.unwrap();
        assert_eq!(skipped, 1);
        assert_eq!(store.content_stats().await.unwrap().destinations.countries, 1);
    }

    #[tokio::test]
    async fn test_run_bundle_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"countries": [{{"slug": "portugal", "name": "Portugal"}}],
                "cities": [{{"country_slug": "portugal", "slug": "lisbon", "name": "Lisbon"}}]}}"#
        )
        .unwrap();

        let store = MemoryStore::new();
        let parsed = Args {
            target: Target::Bundle,
            file: file.path().to_path_buf(),
        };

        assert_eq!(run(&store, &test_config(), &parsed).await.unwrap(), 0);
        let stats = store.content_stats().await.unwrap();
        assert_eq!(stats.destinations.cities, 1);
    }
}
