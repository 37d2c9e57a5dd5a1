mod editor;
mod item;
mod sequence;

pub use editor::ListEditor;
pub use item::Item;
pub use sequence::Sequence;
