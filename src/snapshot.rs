//! Snapshot files: the three collection arrays plus the combined and metadata
//! files, written once by the fetch job and read once at server startup.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::anilist::AnimeSource;
use crate::catalog::Collection;
use crate::models::AnimeRecord;

pub const LATEST_FILE: &str = "latest-anime.json";
pub const POPULAR_FILE: &str = "popular-anime.json";
pub const NEW_RELEASES_FILE: &str = "new-releases-anime.json";
pub const COMBINED_FILE: &str = "anime-data.json";
pub const METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub latest: Vec<AnimeRecord>,
    pub popular: Vec<AnimeRecord>,
    pub new_releases: Vec<AnimeRecord>,
    pub generated_at: Option<DateTime<Utc>>,
}

/// Shape of `anime-data.json` and of the `/api/all-anime` response.
#[derive(Debug, Serialize)]
pub struct CombinedSnapshot<'a> {
    pub latest: &'a [AnimeRecord],
    pub popular: &'a [AnimeRecord],
    #[serde(rename = "newReleases")]
    pub new_releases: &'a [AnimeRecord],
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    #[serde(rename = "totalAnime")]
    pub total_anime: usize,
    pub files: Vec<String>,
}

pub fn collection_file(collection: Collection) -> &'static str {
    match collection {
        Collection::Latest => LATEST_FILE,
        Collection::Popular => POPULAR_FILE,
        Collection::NewReleases => NEW_RELEASES_FILE,
    }
}

impl Snapshot {
    pub fn collection(&self, collection: Collection) -> &[AnimeRecord] {
        match collection {
            Collection::Latest => &self.latest,
            Collection::Popular => &self.popular,
            Collection::NewReleases => &self.new_releases,
        }
    }

    pub fn combined(&self, generated_at: DateTime<Utc>) -> CombinedSnapshot<'_> {
        CombinedSnapshot {
            latest: &self.latest,
            popular: &self.popular,
            new_releases: &self.new_releases,
            generated_at,
        }
    }

    pub fn total_records(&self) -> usize {
        self.latest.len() + self.popular.len() + self.new_releases.len()
    }

    /// Reads the three collection files from `dir`. The generation timestamp
    /// comes from the combined file or metadata file when either is present.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let latest = read_collection(&dir.join(LATEST_FILE))?;
        let popular = read_collection(&dir.join(POPULAR_FILE))?;
        let new_releases = read_collection(&dir.join(NEW_RELEASES_FILE))?;
        let generated_at = read_generated_at(dir);
        info!(
            "Loaded snapshot from {}: {} latest, {} popular, {} new releases",
            dir.display(),
            latest.len(),
            popular.len(),
            new_releases.len()
        );
        Ok(Self {
            latest,
            popular,
            new_releases,
            generated_at,
        })
    }

    /// Writes every snapshot file into `dir`, or none of them.
    ///
    /// All payloads are serialized and staged as hidden temp files first; the
    /// real files are only replaced once every stage write has succeeded. If
    /// moving any file into place fails, the files already replaced are
    /// restored from their backups.
    pub fn write_dir(&self, dir: &Path, generated_at: DateTime<Utc>) -> Result<Vec<String>> {
        for collection in Collection::ALL {
            if self.collection(collection).is_empty() {
                bail!(
                    "Refusing to write snapshot: {} collection is empty",
                    collection.as_str()
                );
            }
        }

        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create snapshot directory {}", dir.display()))?;

        let mut payloads: Vec<(&str, Vec<u8>)> = Vec::new();
        for collection in Collection::ALL {
            let body = serde_json::to_vec_pretty(self.collection(collection))
                .context("Failed to serialize collection")?;
            payloads.push((collection_file(collection), body));
        }
        let combined = serde_json::to_vec_pretty(&self.combined(generated_at))
            .context("Failed to serialize combined snapshot")?;
        payloads.push((COMBINED_FILE, combined));

        let metadata = SnapshotMetadata {
            generated_at,
            total_anime: self.total_records(),
            files: payloads.iter().map(|(name, _)| name.to_string()).collect(),
        };
        let metadata = serde_json::to_vec_pretty(&metadata).context("Failed to serialize metadata")?;
        payloads.push((METADATA_FILE, metadata));

        let mut staged: Vec<Staged> = Vec::with_capacity(payloads.len());
        for (name, body) in &payloads {
            let temp = dir.join(format!(".{}.tmp", name));
            if let Err(e) = fs::write(&temp, body) {
                discard_staged(&staged);
                let _ = fs::remove_file(&temp);
                return Err(e).with_context(|| format!("Failed to stage {}", temp.display()));
            }
            staged.push(Staged {
                temp,
                target: dir.join(name),
                backup: dir.join(format!(".{}.bak", name)),
            });
        }

        let mut committed: Vec<(&Staged, bool)> = Vec::with_capacity(staged.len());
        for (idx, file) in staged.iter().enumerate() {
            match file.commit() {
                Ok(backed_up) => {
                    debug!("Wrote {}", file.target.display());
                    committed.push((file, backed_up));
                }
                Err(e) => {
                    rollback(&committed);
                    discard_staged(&staged[idx..]);
                    warn!("Snapshot write rolled back, previous files restored");
                    return Err(e);
                }
            }
        }
        for (file, backed_up) in &committed {
            if *backed_up {
                let _ = fs::remove_file(&file.backup);
            }
        }

        Ok(payloads.iter().map(|(name, _)| name.to_string()).collect())
    }
}

/// Fetches all three collections concurrently. Fails as a whole if any one
/// request fails, so callers never see a partial snapshot.
pub async fn fetch_snapshot(source: &dyn AnimeSource) -> Result<Snapshot> {
    let (latest, popular, new_releases) = tokio::try_join!(
        source.fetch_collection(Collection::Latest),
        source.fetch_collection(Collection::Popular),
        source.fetch_collection(Collection::NewReleases),
    )?;
    info!("Fetched {} latest anime", latest.len());
    info!("Fetched {} popular anime", popular.len());
    info!("Fetched {} new releases", new_releases.len());
    Ok(Snapshot {
        latest,
        popular,
        new_releases,
        generated_at: None,
    })
}

fn read_collection(path: &Path) -> Result<Vec<AnimeRecord>> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read snapshot file {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("Failed to parse snapshot file {}", path.display()))
}

fn read_generated_at(dir: &Path) -> Option<DateTime<Utc>> {
    #[derive(Deserialize)]
    struct Stamp {
        #[serde(rename = "generatedAt")]
        generated_at: DateTime<Utc>,
    }

    for name in [COMBINED_FILE, METADATA_FILE] {
        let path = dir.join(name);
        let Ok(bytes) = fs::read(&path) else {
            continue;
        };
        match serde_json::from_slice::<Stamp>(&bytes) {
            Ok(stamp) => return Some(stamp.generated_at),
            Err(e) => warn!("Ignoring unreadable {}: {}", path.display(), e),
        }
    }
    None
}

/// One snapshot file written to a hidden temp sibling, waiting to replace
/// its target.
struct Staged {
    temp: PathBuf,
    target: PathBuf,
    backup: PathBuf,
}

impl Staged {
    /// Moves an existing target file aside, then the temp file into place.
    /// Returns whether a backup was taken. On error the target is as it was.
    fn commit(&self) -> Result<bool> {
        let backed_up = fs::symlink_metadata(&self.target)
            .map(|m| m.is_file())
            .unwrap_or(false);
        if backed_up {
            fs::rename(&self.target, &self.backup).with_context(|| {
                format!("Failed to move {} aside", self.target.display())
            })?;
        }
        if let Err(e) = fs::rename(&self.temp, &self.target) {
            if backed_up {
                let _ = fs::rename(&self.backup, &self.target);
            }
            return Err(e)
                .with_context(|| format!("Failed to move {} into place", self.target.display()));
        }
        Ok(backed_up)
    }
}

/// Puts back every target replaced so far, newest first. Targets that did
/// not exist before the write are removed.
fn rollback(committed: &[(&Staged, bool)]) {
    for (file, backed_up) in committed.iter().rev() {
        let restored = if *backed_up {
            fs::rename(&file.backup, &file.target)
        } else {
            fs::remove_file(&file.target)
        };
        if let Err(e) = restored {
            warn!("Failed to restore {}: {}", file.target.display(), e);
        }
    }
}

fn discard_staged(staged: &[Staged]) {
    for file in staged {
        let _ = fs::remove_file(&file.temp);
    }
}
