//! Edge transforms run by the API proxy on each request and response.
//!
//! Every transform is a pure function over a typed slice of the proxy's context
//! variables. [`Script`] reads that slice from a [`VariableBag`], runs the
//! transform and writes the result back.

pub mod context;
pub mod diagnostics;
pub mod endpoint;
pub mod headers;
pub mod script;
pub mod version;

pub use context::{Changes, VariableBag};
pub use script::Script;
