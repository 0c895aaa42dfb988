//semantic layer fused into the parser:
//values, the per-parse context and the evaluation rules

pub mod semantic_context;
pub mod semantic_error;
pub mod semantic_eval;
pub mod semantic_value;

pub use semantic_context::{Context, FunctionSignature};
pub use semantic_error::{FatalError, SemanticError};
pub use semantic_value::Value;
