pub mod list;
pub mod map;
pub mod merge;
pub mod set;

pub use list::ListPatch;
pub use map::MapPatch;
pub use merge::{MergePatch, MergePatchError};
pub use set::SetPatch;
