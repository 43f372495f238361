//! Seni compiler: flattens the parsed AST into compiled forms.
//!
//! ```text
//! (go arg1: 45 arg2: 11)  →  (go {arg1: 45 arg2: 11})
//! "text"                  →  (quote "text")
//! [12 (int)]              →  12, or the next gene when compiling with a genotype
//! ```

mod compiler;

pub use compiler::{
    compile, compile_with_genotype, literal_value, uses_named_parameters, CompileResult, Compiler,
};
