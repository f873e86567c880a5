//! Output formats
//!
//! Text renderings of every stage's output, used by the [processor](crate::wiremark::processor)
//! and the `wiremark` binary:
//!
//! - tokens as a compact tag stream or JSON ([tokens])
//! - the CST as an indented rule outline ([cst_debug])
//! - the AST as a box-drawn tree ([treeviz]); JSON and YAML come straight from serde
//! - diagnostics one per line or as JSON ([diagnostics])

pub mod cst_debug;
pub mod diagnostics;
pub mod tokens;
pub mod treeviz;

pub use cst_debug::to_cst_debug_str;
pub use treeviz::to_treeviz_str;
