//! in-memory share store
//!
//! keeps the same encoded forms the file store writes, so everything that
//! passes through it exercises the wire format.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::metadata::SplitMetadata;
use crate::share::ShareRecord;
use crate::split::SplitOutput;
use crate::store::ShareStore;
use crate::{Error, Result};

#[derive(Debug, Default)]
pub struct MemoryStore {
    metadata: RwLock<Option<Vec<u8>>>,
    shares: RwLock<BTreeMap<u16, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a share, as a holder losing theirs would.
    pub fn remove_share(&self, x: u16) -> Result<bool> {
        let mut shares = self.shares.write().map_err(|e| Error::Storage(e.to_string()))?;
        Ok(shares.remove(&x).is_some())
    }

    /// Raw encoded body of a share.
    pub fn raw_share(&self, x: u16) -> Result<Option<Vec<u8>>> {
        let shares = self.shares.read().map_err(|e| Error::Storage(e.to_string()))?;
        Ok(shares.get(&x).cloned())
    }
}

impl ShareStore for MemoryStore {
    fn put_metadata(&self, metadata: &SplitMetadata) -> Result<()> {
        let encoded = metadata.to_json()?;
        let mut slot = self.metadata.write().map_err(|e| Error::Storage(e.to_string()))?;
        *slot = Some(encoded);
        Ok(())
    }

    fn get_metadata(&self) -> Result<Option<SplitMetadata>> {
        let slot = self.metadata.read().map_err(|e| Error::Storage(e.to_string()))?;
        slot.as_deref().map(SplitMetadata::from_json).transpose()
    }

    fn put_share(&self, share: &ShareRecord) -> Result<()> {
        let mut shares = self.shares.write().map_err(|e| Error::Storage(e.to_string()))?;
        shares.insert(share.x(), share.encode());
        Ok(())
    }

    fn get_share(&self, x: u16) -> Result<Option<ShareRecord>> {
        let shares = self.shares.read().map_err(|e| Error::Storage(e.to_string()))?;
        shares
            .get(&x)
            .map(|bytes| ShareRecord::decode(x, bytes))
            .transpose()
    }

    /// Replaces the previous split wholesale.
    fn write_split(&self, output: &SplitOutput) -> Result<()> {
        {
            let mut shares = self.shares.write().map_err(|e| Error::Storage(e.to_string()))?;
            shares.clear();
            for share in &output.shares {
                shares.insert(share.x(), share.encode());
            }
        }
        self.put_metadata(&output.metadata)
    }

    fn share_points(&self) -> Result<Vec<u16>> {
        let shares = self.shares.read().map_err(|e| Error::Storage(e.to_string()))?;
        Ok(shares.keys().copied().collect())
    }
}
