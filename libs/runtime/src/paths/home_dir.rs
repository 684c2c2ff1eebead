use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the application home directory.
///
/// - `Some(path)`: a leading `~` is expanded to the user's home; relative paths are
///   made absolute against the current working directory.
/// - `None`: `<platform home>/<default_subdir>` (`%APPDATA%` on Windows, `$HOME` elsewhere).
///
/// When `create` is set the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let resolved = match configured {
        Some(raw) => expand_tilde(&raw)?,
        None => platform_home()?.join(default_subdir),
    };

    let absolute = if resolved.is_absolute() {
        resolved
    } else {
        std::env::current_dir()
            .context("cannot read current directory")?
            .join(resolved)
    };

    if create {
        std::fs::create_dir_all(&absolute)
            .with_context(|| format!("cannot create home dir {}", absolute.display()))?;
    }

    Ok(absolute)
}

fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return platform_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_home()?.join(rest));
    }
    Ok(Path::new(raw).to_path_buf())
}

fn platform_home() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "APPDATA";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";

    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("environment variable {var} is not set"))
}
