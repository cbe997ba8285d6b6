/*!
UTVPI over-approximation of rational polyhedra.

Given a polyhedron  P = { x in Q^n : A*x >= b }  as a finite conjunction
of inequalities, this crate computes a UTVPI system Q containing P whose
constraints all have the form  ±x_i <= c  or  ±x_i ± x_j <= c.  Such
systems admit polynomial-time solving, projection and widening, which
makes a tight UTVPI cover a useful primitive for polyhedral static
analyses and dependence testing.

The cover is computed with exact rational arithmetic by recursive
Fourier-Motzkin projection: the input is projected onto every pair of
variables, and the axis-aligned and rotated (x+y, x-y) bounds of each
two-variable face are read off directly. An LP-driven extractor is
available as an alternative for systems beyond Fourier-Motzkin's reach;
it trades exactness for dyadic upper bounds obtained from a
floating-point simplex.

# Example

```rust
use utvpi::{find_oa, System};

// x0 >= 0, x1 >= 0
let system = System::parse("2 4  1 1 0 0  1 0 1 0");
let cover = find_oa(&system, None).expect("the quadrant is not empty");
assert_eq!(3, cover.nlines()); // -x0 <= 0, -x1 <= 0, -x0-x1 <= 0
```
*/

use std::fmt;

pub mod bounds;
pub mod fm_oa;
pub mod lp;
pub mod lp_oa;
pub mod rational;
pub mod redundancy;
pub mod row;
pub mod system;

pub use bounds::{simplify_single_var, VarBounds};
pub use fm_oa::{find_oa, vanilla_fm_oa};
pub use lp::{LpOutcome, LpSolver, MicroLp};
pub use lp_oa::{ceil_num, find_oa_lp, DEFAULT_PRECISION};
pub use rational::Rational;
pub use redundancy::remove_redundant;
pub use row::Row;
pub use system::System;

/// Sentinel for an empty input polyhedron, threaded through the
/// projector as a value. Its rendering is the literal output line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Infeasible;

impl fmt::Display for Infeasible {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Infeasible!")
    }
}

impl std::error::Error for Infeasible {}
