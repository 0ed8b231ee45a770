//! Type checking module.
//!
//! This module performs the second semantic pass over the resolved tree:
//!
//! - Computing a type for every expression, bottom-up
//! - Verifying operator, call, and assignment type rules
//! - Checking declarations against their initializers and prototypes
//! - Verifying `if`/`for` conditions and `return` types
//!
//! Diagnostics accumulate rather than aborting the pass, so a single run
//! surfaces every independent error in the program.

pub mod type_checker;
