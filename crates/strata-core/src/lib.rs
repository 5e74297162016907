//! Zero-copy strided views over caller-owned buffers.
//!
//! A [`TensorView`] pairs a base address with a [`Shape`] (sizes and signed strides, in
//! element units). Views never own the memory they address: they are derived from
//! slices, re-derived from one another (indexing, slicing, squeezing, promotion), and
//! reinterpreted under another element width ([`ErasedView`]) or another aggregate
//! structure ([`FieldLayout`]) without copying.
extern crate self as strata;

mod enforcer;
mod kind;
mod layout;
mod shape;
mod strides;
mod view;

pub use enforcer::*;
pub use kind::*;
pub use layout::*;
pub use shape::*;
pub use strides::*;
pub use view::*;

#[cfg(feature = "derive")]
pub use strata_macros::FieldLayout;

use smallvec::SmallVec;
pub type RVec<T> = SmallVec<[T; 4]>;

//https://github.com/sonos/tract/blob/main/data/src/macros.rs#L2
#[macro_export]
macro_rules! rvec {
    (@one $x:expr) => (1usize);
    ($elem:expr; $n:expr) => ({
        $crate::RVec::from_elem($elem, $n)
    });
    ($($x:expr),*$(,)*) => ({
        let count = 0usize $(+ $crate::rvec![@one $x])*;
        #[allow(unused_mut)]
        let mut vec = $crate::RVec::new();
        if count <= vec.inline_size() {
            $(vec.push($x);)*
            vec
        } else {
            $crate::RVec::from_vec(vec![$($x,)*])
        }
    });
}

/// Builds a densely strided [`Shape`] from its sizes.
#[macro_export]
macro_rules! shape {
    ($($x:expr),*$(,)*) => ({
        use $crate::rvec;
        $crate::Shape::new(rvec![$($x,)*])
    });
}

pub mod prelude {
    pub use crate::{
        rvec, shape, ErasedView, ErasedViewMut, FieldLayout, Shape, TensorView, TensorViewMut,
    };
}
