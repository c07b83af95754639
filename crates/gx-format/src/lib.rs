//! # gx-format — JWildfire Gradient File Formats
//!
//! Reading and writing the two palette formats JWildfire consumes:
//!
//! - **MAP** — 256 lines of space-separated RGB triples, one color per
//!   line, sampled uniformly across the gradient.
//! - **UGR** — XML with `<gradient>` elements holding `<color>` stops on a
//!   0-399 integer index axis; a single file can carry a whole pack.
//!
//! Writers are pure string renderers with thin filesystem wrappers on top;
//! parsers are tolerant of cosmetic noise (blank lines, unknown attributes)
//! but reject structurally broken input with a [`FormatError`].

pub mod error;
pub mod map;
pub mod ugr;

pub use error::FormatError;
pub use map::{MAP_SAMPLES, load_map, parse_map, save_map, write_map};
pub use ugr::{load_ugr, parse_ugr, save_ugr, write_ugr};

/// Most stops a gradient loaded from disk may carry; larger files are
/// downsampled on load.
pub const MAX_FILE_STOPS: usize = 64;
