use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

pub(crate) fn source(line: &str) -> NamedSource<String> {
    NamedSource::new("<input>", line.to_string())
}

/// Everything that can go wrong with a single input line.
///
/// None of these end the session; the shell reports them and reads the next
/// line. A line that fails leaves `ans` and `mem` untouched.
#[derive(Error, Debug, Diagnostic)]
pub enum CalcError {
    #[error("cannot recognize a number or variable: '{token}'")]
    #[diagnostic(
        code(calc::unrecognized_operand),
        help("operands are numbers such as `2`, `-0.5`, `1e3`, or the variables `ans` and `mem`")
    )]
    UnrecognizedOperand {
        token: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("this operand")]
        span: SourceSpan,
    },

    #[error("only one operation is permitted per line")]
    #[diagnostic(
        code(calc::malformed_expression),
        help("write `a op b` or `op x`, for example `2 + 3` or `sqrt 16`")
    )]
    MalformedExpression {
        found: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("expected 2 or 3 words")]
        span: SourceSpan,
    },

    #[error("unknown operator: '{op}'")]
    #[diagnostic(
        code(calc::unknown_operator),
        help("binary operators are `+`, `-`, `*`, `/` and `%`")
    )]
    UnknownOperator {
        op: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("this operator")]
        span: SourceSpan,
    },

    #[error("unknown operation: '{op}'")]
    #[diagnostic(
        code(calc::unknown_operation),
        help("unary operations are `sqrt`, `sqr` and `inv`")
    )]
    UnknownOperation {
        op: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("this operation")]
        span: SourceSpan,
    },

    #[error("division by zero")]
    #[diagnostic(code(calc::division_by_zero))]
    DivisionByZero {
        #[source_code]
        src: NamedSource<String>,
        #[label("this is zero")]
        span: SourceSpan,
    },

    #[error("square root of a negative number")]
    #[diagnostic(
        code(calc::negative_square_root),
        help("only non-negative numbers have a real square root")
    )]
    NegativeSquareRoot {
        #[source_code]
        src: NamedSource<String>,
        #[label("this is negative")]
        span: SourceSpan,
    },
}

impl CalcError {
    /// The span of the input line this error points at.
    pub fn span(&self) -> SourceSpan {
        match self {
            CalcError::UnrecognizedOperand { span, .. }
            | CalcError::MalformedExpression { span, .. }
            | CalcError::UnknownOperator { span, .. }
            | CalcError::UnknownOperation { span, .. }
            | CalcError::DivisionByZero { span, .. }
            | CalcError::NegativeSquareRoot { span, .. } => *span,
        }
    }
}
