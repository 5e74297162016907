/// How a view's rank is dispatched on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RankKind {
    /// No axes, exactly one element.
    Scalar,
    /// One axis with unit stride; the elements form a contiguous run.
    Dense1D,
    /// Any other layout.
    StridedND,
}

/// What a view may do with the elements it addresses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Access {
    /// Typed reads and writes.
    Typed,
    /// Typed reads only.
    #[default]
    ReadOnly,
    /// Addresses only, in byte units.
    Erased,
}

impl Access {
    pub fn is_writable(self) -> bool {
        matches!(self, Access::Typed)
    }
}

mod private {
    pub trait Sealed {}
}

/// Type-level access marker carried by views.
pub trait Mutability: private::Sealed + 'static {
    const ACCESS: Access;
}

/// Marker for views that only read.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReadOnly;

/// Marker for views that read and write.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReadWrite;

impl private::Sealed for ReadOnly {}
impl private::Sealed for ReadWrite {}

impl Mutability for ReadOnly {
    const ACCESS: Access = Access::ReadOnly;
}

impl Mutability for ReadWrite {
    const ACCESS: Access = Access::Typed;
}
