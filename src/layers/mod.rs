//! Map layer bookkeeping: the registry of drawn/uploaded/route layers and
//! the highlight mirror echoing selected table rows onto the map.

pub mod highlight;
pub mod registry;

pub use highlight::{HighlightMirror, HighlightSink};
pub use registry::{Layer, LayerId, LayerKind, LayerRegistry};
