//! Package loading: locate a Go package on disk, parse its files, and
//! collect its definitions with evaluated constant values.

pub mod const_eval;
pub mod loader;
pub mod locate;
pub mod symbols;

pub use const_eval::ConstValue;
pub use loader::{Package, PackageLoader};
pub use locate::{find_module, locate_package, GoModule};
pub use symbols::{Definition, SymbolKind};
