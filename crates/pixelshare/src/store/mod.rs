//! share stores
//!
//! a store is where a split's output lives between split and reconstruction:
//! one metadata record plus any number of shares keyed by evaluation point.
//! all I/O happens here, before or after the codec's compute phase.
//!
//! implementations:
//! - file: a directory of `share_{x}.bin` files and `metadata.json`
//! - memory: in-process, for tests and embedding

pub mod file;
pub mod memory;

pub use file::{recover_image_from_dir, split_image_to_dir, validate_shares, FileStore};
pub use memory::MemoryStore;

use tracing::debug;

use crate::metadata::SplitMetadata;
use crate::reconstruct::ShareBundle;
use crate::share::ShareRecord;
use crate::split::SplitOutput;
use crate::Result;

/// Pluggable destination for shares and their metadata.
pub trait ShareStore: Send + Sync {
    fn put_metadata(&self, metadata: &SplitMetadata) -> Result<()>;

    /// `None` when no metadata record was stored.
    fn get_metadata(&self) -> Result<Option<SplitMetadata>>;

    fn put_share(&self, share: &ShareRecord) -> Result<()>;

    fn get_share(&self, x: u16) -> Result<Option<ShareRecord>>;

    /// Evaluation points of the stored shares, ascending.
    fn share_points(&self) -> Result<Vec<u16>>;

    /// Persist a whole split.
    fn write_split(&self, output: &SplitOutput) -> Result<()> {
        for share in &output.shares {
            self.put_share(share)?;
        }
        self.put_metadata(&output.metadata)?;
        debug!(shares = output.shares.len(), "wrote split");
        Ok(())
    }

    /// Gather everything stored into a bundle ready for reconstruction.
    ///
    /// Missing metadata is not an error here; the bundle reports it when
    /// reconstruction is attempted.
    fn load_bundle(&self) -> Result<ShareBundle> {
        let mut bundle = ShareBundle::new();
        if let Some(metadata) = self.get_metadata()? {
            bundle.set_metadata(metadata);
        }
        for x in self.share_points()? {
            if let Some(share) = self.get_share(x)? {
                bundle.add_share(share);
            }
        }
        debug!(points = ?bundle.points(), has_metadata = bundle.metadata().is_some(), "loaded bundle");
        Ok(bundle)
    }
}
