use crate::config::{LoggingConfig, Section};
use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

use file_rotate::{
    compression::Compression,
    suffix::AppendCount,
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";

fn parse_level(s: &str) -> LevelFilter {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" | "" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" | "none" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/// true if `target` is `prefix` or lives under `prefix::`
fn target_matches(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

// -------- rotating file sink --------

type SharedRotate = Arc<Mutex<FileRotate<AppendCount>>>;

struct SinkHandle(Option<SharedRotate>);

impl Write for SinkHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &self.0 {
            Some(file) => file
                .lock()
                .map_err(|_| std::io::Error::other("log file lock poisoned"))?
                .write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &self.0 {
            Some(file) => file
                .lock()
                .map_err(|_| std::io::Error::other("log file lock poisoned"))?
                .flush(),
            None => Ok(()),
        }
    }
}

/// Routes each record to the file of the most specific subsystem section,
/// falling back to the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<SharedRotate>,
    subsystems: Vec<(String, SharedRotate)>,
}

impl FileRouter {
    fn route(&self, target: &str) -> Option<SharedRotate> {
        self.subsystems
            .iter()
            .filter(|(prefix, _)| target_matches(target, prefix))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, file)| file.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.subsystems.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = SinkHandle;

    fn make_writer(&'a self) -> Self::Writer {
        SinkHandle(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        SinkHandle(self.route(meta.target()))
    }
}

/// Relative log paths are resolved against `base_dir` (server.home_dir).
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating(section: &Section, base_dir: &Path) -> std::io::Result<Option<SharedRotate>> {
    if section.file.trim().is_empty() {
        return Ok(None);
    }
    let path = resolve_log_path(&section.file, base_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let max_bytes = section.max_size_mb.unwrap_or(100) * 1024 * 1024;
    let rotate = FileRotate::new(
        &path,
        AppendCount::new(section.max_backups.unwrap_or(3)),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(Some(Arc::new(Mutex::new(rotate))))
}

fn build_targets(cfg: &LoggingConfig, level_of: impl Fn(&Section) -> LevelFilter) -> Targets {
    let default_level = cfg
        .get(DEFAULT_SECTION)
        .map(&level_of)
        .unwrap_or(LevelFilter::INFO);

    cfg.iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_SECTION)
        .fold(Targets::new().with_default(default_level), |targets, (name, section)| {
            targets.with_target(name.clone(), level_of(section))
        })
}

fn build_file_router(cfg: &LoggingConfig, base_dir: &Path) -> FileRouter {
    let mut router = FileRouter::default();
    for (name, section) in cfg {
        match open_rotating(section, base_dir) {
            Ok(Some(file)) if name == DEFAULT_SECTION => router.default = Some(file),
            Ok(Some(file)) => router.subsystems.push((name.clone(), file)),
            Ok(None) => {}
            // tracing is not installed yet, stderr is the only channel left
            Err(e) => eprintln!("cannot open log file '{}' for '{}': {}", section.file, name, e),
        }
    }
    router
}

// -------- public init --------

/// Install the global subscriber.
/// - console: human-readable, per-subsystem `console_level`
/// - files: JSON lines, per-subsystem `file_level`, size-rotated
///
/// Relative file paths are resolved against `base_dir`. Calling this twice is a no-op.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` records before the subscriber is installed
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let console = fmt::layer()
        .with_ansi(atty::is(atty::Stream::Stdout))
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(build_targets(cfg, |s| parse_level(&s.console_level)));

    let router = build_file_router(cfg, base_dir);
    let file = (!router.is_empty()).then(|| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(router)
            .with_filter(build_targets(cfg, |s| {
                if s.file.trim().is_empty() {
                    LevelFilter::OFF
                } else {
                    parse_level(&s.file_level)
                }
            }))
    });

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;

    fn section(console: &str, file: &str) -> Section {
        Section {
            console_level: console.into(),
            file: file.into(),
            file_level: "debug".into(),
            max_backups: Some(2),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn level_parsing() {
        assert_eq!(parse_level("TRACE"), LevelFilter::TRACE);
        assert_eq!(parse_level("debug"), LevelFilter::DEBUG);
        assert_eq!(parse_level(""), LevelFilter::INFO);
        assert_eq!(parse_level("off"), LevelFilter::OFF);
        assert_eq!(parse_level("bogus"), LevelFilter::INFO);
    }

    #[test]
    fn target_prefix_matching() {
        assert!(target_matches("job_scheduler", "job_scheduler"));
        assert!(target_matches("job_scheduler::domain::service", "job_scheduler"));
        assert!(!target_matches("job_scheduler_extra", "job_scheduler"));
        assert!(!target_matches("sea_orm", "job_scheduler"));
    }

    #[test]
    fn relative_paths_resolve_under_base_dir() {
        let tmp = tempdir().unwrap();
        let resolved = resolve_log_path("logs/a.log", tmp.path());
        assert!(resolved.starts_with(tmp.path()));
        assert!(resolved.ends_with("logs/a.log"));
    }

    #[test]
    fn router_prefers_most_specific_subsystem() {
        let tmp = tempdir().unwrap();
        let mut cfg = default_logging_config();
        cfg.insert("job_scheduler".into(), section("info", "logs/jobs.log"));
        cfg.insert(
            "job_scheduler::infra".into(),
            section("info", "logs/infra.log"),
        );

        let router = build_file_router(&cfg, tmp.path());
        assert!(router.default.is_some());
        assert_eq!(router.subsystems.len(), 2);

        let infra = router.route("job_scheduler::infra::storage").unwrap();
        let (_, expected) = router
            .subsystems
            .iter()
            .find(|(p, _)| p == "job_scheduler::infra")
            .unwrap();
        assert!(Arc::ptr_eq(&infra, expected));

        let fallback = router.route("sea_orm::driver").unwrap();
        assert!(Arc::ptr_eq(&fallback, router.default.as_ref().unwrap()));
        assert!(tmp.path().join("logs").is_dir());
    }

    #[test]
    fn empty_file_disables_sink() {
        let tmp = tempdir().unwrap();
        let mut cfg = LoggingConfig::new();
        cfg.insert("default".into(), section("info", ""));
        assert!(build_file_router(&cfg, tmp.path()).is_empty());
    }
}
