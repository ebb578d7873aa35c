//! Prelude module - common imports for xlm-fill users
//!
//! ```rust
//! use xlm_fill::prelude::*;
//! ```

pub use crate::{
    // Cell types
    CellRecord,
    CellStore,
    CellTableOptions,
    CellValue,

    // Driver
    deobfuscate,
    Deobfuscator,

    // Error types
    Error,
    FormulaChain,
    ReferenceStyle,
    Result,

    SolveOptions,
    SolveReport,
};
