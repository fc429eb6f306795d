//! # Sleigh Includes
//!
//! Local header discovery for C++ sources. Only whole-line quoted includes
//! of `.h`/`.hh` files (`#include "name.hh"`) are followed, and every header
//! is looked up in the same source directory.

pub mod directive;
pub mod resolver;
pub mod graph;

pub use directive::{parse_include, scan_includes, scan_source};
pub use graph::IncludeGraph;
pub use resolver::HeaderResolver;
