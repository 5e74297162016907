use std::fmt::{self, Display, Write};

use bytemuck::Pod;

use crate::{Mutability, RankKind, TensorView};

/// Nested text dump: the shape, then one line per innermost run of elements, each
/// nesting level indented by one more space and closed by an empty line.
impl<T: Pod + Display, A: Mutability> Display for TensorView<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.shape())?;
        render(self, "", f)
    }
}

fn render<T: Pod + Display, A: Mutability>(
    view: &TensorView<'_, T, A>,
    indent: &str,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match view.kind() {
        RankKind::Scalar => write!(f, "{}", view.item()),
        RankKind::Dense1D | RankKind::StridedND => {
            let nested = format!("{indent} ");
            for sub in view.outer_views() {
                f.write_str(indent)?;
                render(&sub, &nested, f)?;
            }
            f.write_char('\n')
        }
    }
}
