use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

/// Which artifact a file holds, with the Android user it belongs to when the
/// path encodes one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    /// `system_ce/<user>/notification_history/history/<epoch-ms>`
    History { user: String },
    /// `system/users/<user>/settings_secure.xml`
    SettingsSecure { user: String },
    /// `system/notification_policy.xml`
    NotificationPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

impl ArtifactFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn history_re() -> &'static Regex {
    static HISTORY_RE: OnceLock<Regex> = OnceLock::new();
    HISTORY_RE.get_or_init(|| {
        Regex::new(r"(?:^|/)system_ce/([^/]+)/notification_history/history/[^/]+$")
            .expect("valid history path regex")
    })
}

fn settings_re() -> &'static Regex {
    static SETTINGS_RE: OnceLock<Regex> = OnceLock::new();
    SETTINGS_RE.get_or_init(|| {
        Regex::new(r"(?:^|/)system/users/([^/]+)/settings_secure\.xml$")
            .expect("valid settings path regex")
    })
}

fn policy_re() -> &'static Regex {
    static POLICY_RE: OnceLock<Regex> = OnceLock::new();
    POLICY_RE.get_or_init(|| {
        Regex::new(r"(?:^|/)system/notification_policy\.xml$").expect("valid policy path regex")
    })
}

/// Classify a path by the artifact layout of an Android data partition.
pub fn classify(path: &Path) -> Option<ArtifactKind> {
    let normalized = path.to_string_lossy().replace('\\', "/");

    if let Some(caps) = history_re().captures(&normalized) {
        return Some(ArtifactKind::History { user: caps[1].to_string() });
    }
    if let Some(caps) = settings_re().captures(&normalized) {
        return Some(ArtifactKind::SettingsSecure { user: caps[1].to_string() });
    }
    if policy_re().is_match(&normalized) {
        return Some(ArtifactKind::NotificationPolicy);
    }
    None
}

/// Scanner for notification history artifacts below an extraction root
pub struct ArtifactScanner {
    root: PathBuf,
}

impl ArtifactScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the root and return every recognised artifact, sorted by path.
    pub fn scan(&self) -> std::io::Result<Vec<ArtifactFile>> {
        if !self.root.is_dir() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("input directory {} does not exist", self.root.display()),
            ));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Failed to read entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(kind) = classify(entry.path()) {
                tracing::debug!(path = %entry.path().display(), ?kind, "found artifact");
                files.push(ArtifactFile { path: entry.path().to_path_buf(), kind });
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::info!(
            root = %self.root.display(),
            artifacts = files.len(),
            "scanned for notification history artifacts"
        );
        Ok(files)
    }
}
