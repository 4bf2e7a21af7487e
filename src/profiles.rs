//! Congresspeople Twitter profiles, read from a CSV file.

use log::{debug, info};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// One tracked congressperson and up to two handles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub twitter_profile: Option<String>,
    #[serde(default)]
    pub secondary_twitter_profile: Option<String>,
}

impl Profile {
    pub fn new(primary: Option<&str>, secondary: Option<&str>) -> Self {
        Profile {
            twitter_profile: primary.map(str::to_string),
            secondary_twitter_profile: secondary.map(str::to_string),
        }
    }
}

/// Lazily loaded, memoized table of profiles.
///
/// The file is read on the first call to [`ProfileDirectory::profiles`] and
/// never again; restart the process to pick up changes.
#[derive(Debug)]
pub struct ProfileDirectory {
    path: PathBuf,
    profiles: OnceLock<Vec<Profile>>,
}

impl ProfileDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProfileDirectory {
            path: path.into(),
            profiles: OnceLock::new(),
        }
    }

    /// A directory that already holds `profiles` and never touches the disk.
    pub fn from_profiles(profiles: Vec<Profile>) -> Self {
        let cache = OnceLock::new();
        let _ = cache.set(profiles);
        ProfileDirectory {
            path: PathBuf::new(),
            profiles: cache,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The profile table, loading it on first use.
    ///
    /// # Returns
    ///
    /// - `Ok(&[Profile])`: The cached rows
    /// - `Err(Error::Csv)`: If the file is missing or malformed
    pub fn profiles(&self) -> Result<&[Profile]> {
        if let Some(profiles) = self.profiles.get() {
            return Ok(profiles);
        }

        let loaded = load_profiles(&self.path)?;
        Ok(self.profiles.get_or_init(|| loaded))
    }

    /// Every distinct, non-blank handle across both columns, primary column first.
    pub fn handles(&self) -> Result<Vec<String>> {
        let profiles = self.profiles()?;
        let primary = profiles.iter().map(|p| &p.twitter_profile);
        let secondary = profiles.iter().map(|p| &p.secondary_twitter_profile);

        let mut seen = HashSet::new();
        let handles: Vec<String> = primary
            .chain(secondary)
            .filter_map(|handle| handle.as_deref())
            .map(str::trim)
            .filter(|handle| !handle.is_empty())
            .filter(|handle| seen.insert(handle.to_string()))
            .map(str::to_string)
            .collect();

        debug!("{} distinct handles in profile table", handles.len());
        Ok(handles)
    }
}

fn load_profiles(path: &Path) -> Result<Vec<Profile>> {
    info!("Loading Twitter profiles from {}", path.display());

    let csv_error = |source: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;

    let mut profiles = Vec::new();
    for record in reader.deserialize::<Profile>() {
        profiles.push(record.map_err(csv_error)?);
    }

    info!("Loaded {} profiles", profiles.len());
    Ok(profiles)
}
