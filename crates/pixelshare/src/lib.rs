//! # pixelshare
//!
//! (k, n) threshold sharing of raster images. a raw pixel buffer is split
//! into n shares; any k of them rebuild the exact buffer, fewer reveal nothing
//! about it.
//!
//! ## how it works
//!
//! ```text
//!   pixel bytes  b0 b1 b2 ...
//!        │
//!        │  per byte: f(x) = b + a1·x + ... + a(k-1)·x^(k-1)  over GF(257)
//!        ▼
//!   ┌─────────┐ ┌─────────┐       ┌─────────┐
//!   │ share 1 │ │ share 2 │  ...  │ share n │   f(1), f(2), ..., f(n)
//!   └────┬────┘ └────┬────┘       └────┬────┘   stored as u16 LE
//!        │           │                 │
//!        └─────┬─────┴───── any k ─────┘
//!              ▼
//!     lagrange interpolation at 0
//!              ▼
//!        pixel bytes (+ metadata.json: mode, size, k, n)
//! ```
//!
//! share elements range over `0..=256`, so the on-disk format uses 16 bits
//! per element. see [`share`] for the layout.
//!
//! ## usage
//!
//! ```rust
//! use pixelshare::{PixelBuffer, PixelMode, Scheme, Splitter};
//!
//! let image = PixelBuffer::new(PixelMode::Rgb, 2, 2, (0..12).collect())?;
//! let output = Splitter::new(Scheme::new(2, 3)?).split(&image)?;
//!
//! // any two holders can rebuild it
//! let recovered = output.bundle(&[1, 3]).reconstruct()?;
//! assert_eq!(recovered, image);
//! # Ok::<(), pixelshare::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod metadata;
pub mod pixel;
pub mod poly;
pub mod reconstruct;
pub mod scheme;
pub mod share;
pub mod split;
pub mod store;

pub use config::SharingConfig;
pub use error::{Error, Result};
pub use metadata::{SplitMetadata, METADATA_VERSION};
pub use pixel::{PixelBuffer, PixelMode};
pub use reconstruct::{reconstruct, select_shares, Reconstructor, ShareBundle};
pub use scheme::{Scheme, MAX_SHARES, MIN_THRESHOLD};
pub use share::{parse_share_file_name, share_file_name, ShareRecord};
pub use split::{split, SplitOutput, Splitter};
pub use store::{
    recover_image_from_dir, split_image_to_dir, validate_shares, FileStore, MemoryStore, ShareStore,
};

pub use pixelshare_field::{FieldElement, FieldError, Gf257, PRIME};
