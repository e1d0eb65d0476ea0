use std::path::PathBuf;
use std::sync::OnceLock;

// Cache the home lookup to avoid repeated environment probing
static CADUCEUS_HOME: OnceLock<PathBuf> = OnceLock::new();

/// Get the Caduceus home directory
/// Checks CADUCEUS_HOME environment variable, falls back to ${HOME}/.caduceus
pub fn caduceus_home() -> PathBuf {
    CADUCEUS_HOME
        .get_or_init(|| {
            if let Ok(path) = std::env::var("CADUCEUS_HOME") {
                PathBuf::from(path)
            } else {
                home_dir().join(".caduceus")
            }
        })
        .clone()
}

/// Get the user's home directory, falling back to "." when undeterminable
pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Directories searched for input files when the caller gives a bare
/// filename instead of a full path. Ordered; the current directory last.
///
/// Not cached: the current directory can change between calls.
pub fn input_search_dirs() -> Vec<PathBuf> {
    let home = home_dir();
    let mut dirs = vec![
        home.join("Downloads"),
        home.join("Desktop"),
        home.join("Documents"),
    ];
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    dirs
}

/// Well-known install locations probed after the ambient PATH when
/// resolving a tool or package-manager front-end. Covers pipx's user bin
/// directory, conda, and both Homebrew prefixes.
pub fn fallback_bin_dirs() -> Vec<PathBuf> {
    vec![
        home_dir().join(".local/bin"),
        PathBuf::from("/opt/anaconda3/bin"),
        PathBuf::from("/opt/homebrew/bin"),
        PathBuf::from("/usr/local/bin"),
    ]
}

/// Get a human-readable description of the current path configuration
pub fn describe_paths() -> String {
    format!(
        "Caduceus Paths:\n  \
        Home: {}\n  \
        Fallback bins: {}\n  \
        Input search: {}",
        caduceus_home().display(),
        fallback_bin_dirs()
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
        input_search_dirs()
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_bin_dirs_include_pipx_location() {
        let dirs = fallback_bin_dirs();
        assert!(dirs.iter().any(|d| d.ends_with(".local/bin")));
    }

    #[test]
    fn test_input_search_dirs_end_with_cwd() {
        let dirs = input_search_dirs();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(dirs.last(), Some(&cwd));
    }
}
