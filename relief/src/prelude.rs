//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use relief::prelude::*;
//! ```

pub use crate::{BatchConfig, BatchResult, BlendParams, NormalField};

pub use crate::{BatchError, PairError, PairErrorKind};

pub use crate::{correct, decode, encode, run};
