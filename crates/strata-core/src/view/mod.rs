mod aggregate;
mod erased;
mod iter;
mod raw;
mod render;
mod tensor_view;

pub use erased::*;
pub use iter::*;
pub(crate) use raw::RawView;
pub use tensor_view::*;
