use thiserror::Error;

/// Fatal conditions raised while turning a parsed function into a flow
/// graph. Every variant aborts the build; no partial graph is handed on.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlowError {
    #[error("Expected exactly one function at the top level, but found {found} items.")]
    NotSingleFunction { found: usize },
    #[error("Expected a function declaration at the top level, but found {found}.")]
    ExpectedFunction { found: String },
    #[error("Unsupported statement on line {line}: {kind}.")]
    UnsupportedStatement { kind: String, line: usize },
    #[error("Unsupported expression on line {line}: {kind}.")]
    UnsupportedExpression { kind: String, line: usize },
    #[error("Labeled `break` on line {line} is not supported.")]
    LabeledBreak { line: usize },
    #[error("Labeled `continue` on line {line} is not supported.")]
    LabeledContinue { line: usize },
    #[error("`break` on line {line} is not inside a loop.")]
    BreakOutsideLoop { line: usize },
    #[error("`continue` on line {line} is not inside a loop.")]
    ContinueOutsideLoop { line: usize },
}
