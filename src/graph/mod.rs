pub mod store;
pub mod index;
pub mod loader;
pub mod weight;

pub use store::{Edge, GraphStore, NodeId};
pub use index::NodeIndex;
pub use weight::{magnitude, Magnitude, Weight};
