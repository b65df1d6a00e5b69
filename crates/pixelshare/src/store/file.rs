//! directory-backed share store

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::metadata::SplitMetadata;
use crate::pixel::PixelBuffer;
use crate::share::{parse_share_file_name, share_file_name, ShareRecord, FILE_PREFIX, FILE_SUFFIX};
use crate::split::{SplitOutput, Splitter};
use crate::store::ShareStore;
use crate::Result;

pub const METADATA_FILE: &str = "metadata.json";

/// A directory holding `metadata.json` and `share_{x}.bin` files.
///
/// The directory is created on first write; reads never create it.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn share_path(&self, x: u16) -> PathBuf {
        self.root.join(share_file_name(x))
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(METADATA_FILE)
    }

    /// Delete every `share_{x}.bin` in the directory. Returns how many went.
    pub fn clear_shares(&self) -> Result<usize> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let mut removed = 0;
        for entry in entries {
            let entry = entry?;
            let is_share = entry
                .file_name()
                .to_str()
                .and_then(parse_share_file_name)
                .is_some();
            if is_share && entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

fn looks_like_share(name: &str) -> bool {
    name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX)
}

/// `Ok(None)` for a missing file, errors otherwise.
fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl ShareStore for FileStore {
    fn put_metadata(&self, metadata: &SplitMetadata) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.metadata_path(), metadata.to_json()?)?;
        Ok(())
    }

    fn get_metadata(&self) -> Result<Option<SplitMetadata>> {
        read_optional(&self.metadata_path())?
            .map(|bytes| SplitMetadata::from_json(&bytes))
            .transpose()
    }

    fn put_share(&self, share: &ShareRecord) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.share_path(share.x()), share.encode())?;
        Ok(())
    }

    fn get_share(&self, x: u16) -> Result<Option<ShareRecord>> {
        read_optional(&self.share_path(x))?
            .map(|bytes| ShareRecord::decode(x, &bytes))
            .transpose()
    }

    /// Replaces whatever split the directory held before, so shares left
    /// over from a larger earlier split cannot mix with the new ones.
    fn write_split(&self, output: &SplitOutput) -> Result<()> {
        let removed = self.clear_shares()?;
        if removed > 0 {
            info!(dir = %self.root.display(), removed, "removed shares of a previous split");
        }
        for share in &output.shares {
            self.put_share(share)?;
        }
        self.put_metadata(&output.metadata)
    }

    fn share_points(&self) -> Result<Vec<u16>> {
        let mut points = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name();
            match name.to_str().and_then(parse_share_file_name) {
                Some(x) if entry.file_type()?.is_file() => points.push(x),
                None if name.to_str().is_some_and(looks_like_share) => {
                    warn!(file = ?name, "ignoring share file with a non-canonical name")
                }
                _ => debug!(file = ?name, "skipping non-share entry"),
            }
        }
        points.sort_unstable();
        Ok(points)
    }
}

/// Quick probe: a metadata record and at least one `.bin` file are present.
pub fn validate_shares(dir: impl AsRef<Path>) -> bool {
    let dir = dir.as_ref();
    if !dir.join(METADATA_FILE).is_file() {
        return false;
    }
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .any(|e| e.path().extension().is_some_and(|ext| ext == "bin")),
        Err(_) => false,
    }
}

/// Split `image` and write the shares plus metadata into `dir`.
pub fn split_image_to_dir(
    image: &PixelBuffer,
    splitter: &Splitter,
    dir: impl AsRef<Path>,
) -> Result<SplitOutput> {
    let output = splitter.split(image)?;
    let store = FileStore::new(dir.as_ref());
    store.write_split(&output)?;
    info!(
        dir = %dir.as_ref().display(),
        threshold = output.metadata.threshold,
        shares = output.metadata.shares,
        "split image"
    );
    Ok(output)
}

/// Load a share directory and reconstruct the image it encodes.
pub fn recover_image_from_dir(dir: impl AsRef<Path>) -> Result<PixelBuffer> {
    let bundle = FileStore::new(dir.as_ref()).load_bundle()?;
    let image = bundle.reconstruct()?;
    info!(
        dir = %dir.as_ref().display(),
        mode = %image.mode(),
        width = image.width(),
        height = image.height(),
        "recovered image"
    );
    Ok(image)
}
