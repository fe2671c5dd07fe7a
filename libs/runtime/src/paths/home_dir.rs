use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the application home directory.
///
/// - `Some(path)`: `~` / `~/...` is expanded against the user's home, relative
///   paths are made absolute against the current directory.
/// - `None`: `<user home>/<default_subdir>`.
///
/// When `create` is set the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let resolved = match configured {
        Some(raw) => expand_user_path(raw.trim())?,
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

fn expand_user_path(raw: &str) -> Result<PathBuf> {
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
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Ok(PathBuf::from(appdata));
        }
    }
    #[cfg(not(target_os = "windows"))]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return Ok(PathBuf::from(home));
        }
    }
    dirs::home_dir().ok_or_else(|| anyhow!("cannot determine user home directory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_absolute_path_is_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("nested").join("home");
        let got = resolve_home_dir(Some(target.to_string_lossy().into_owned()), ".x", true)
            .unwrap();
        assert_eq!(got, target);
        assert!(target.is_dir());
    }

    #[test]
    fn relative_path_becomes_absolute() {
        let got = resolve_home_dir(Some("some/relative".into()), ".x", false).unwrap();
        assert!(got.is_absolute());
        assert!(got.ends_with("some/relative"));
    }
}
