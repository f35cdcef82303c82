use miette::SourceSpan;

use crate::{
    Lexer,
    error::{CalcError, source},
    eval::Registers,
    lex::Token,
};

/// What an operand token stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Atom {
    Number(f64),
    Ans,
    Mem,
}

impl Atom {
    pub fn from_literal(literal: &str) -> Option<Atom> {
        match literal.trim() {
            "ans" => Some(Atom::Ans),
            "mem" => Some(Atom::Mem),
            literal => parse_number(literal).map(Atom::Number),
        }
    }

    /// Reads the registers at the moment of the call; the result is a copy.
    pub fn value(self, registers: &Registers) -> f64 {
        match self {
            Atom::Number(n) => n,
            Atom::Ans => registers.ans,
            Atom::Mem => registers.mem,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operand {
    pub atom: Atom,
    pub span: SourceSpan,
}

impl Operand {
    pub fn parse(token: &Token<'_>, whole: &str) -> Result<Operand, CalcError> {
        match Atom::from_literal(token.literal) {
            Some(atom) => Ok(Operand {
                atom,
                span: token.span(),
            }),
            None => Err(CalcError::UnrecognizedOperand {
                token: token.literal.to_string(),
                src: source(whole),
                span: token.span(),
            }),
        }
    }

    pub fn value(&self, registers: &Registers) -> f64 {
        self.atom.value(registers)
    }
}

/// Resolves a single operand token against the current registers.
pub fn resolve(token: &str, registers: &Registers) -> Result<f64, CalcError> {
    let token = Token {
        literal: token,
        byte: 0,
    };
    Ok(Operand::parse(&token, token.literal)?.value(registers))
}

/// `[+-]? digits ('.' digits?)? ([eE] [+-]? digits)?`, where the integer
/// digits may be omitted if there are fraction digits.
fn parse_number(literal: &str) -> Option<f64> {
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    let unsigned = literal.strip_prefix(['+', '-']).unwrap_or(literal);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };

    let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if (int.is_empty() && frac.is_empty()) || !all_digits(int) || !all_digits(frac) {
        return None;
    }
    if let Some(exponent) = exponent {
        let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if digits.is_empty() || !all_digits(digits) {
            return None;
        }
    }

    literal.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 5] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Rem,
    ];

    pub fn from_symbol(symbol: &str) -> Option<BinaryOp> {
        match symbol {
            "+" => Some(BinaryOp::Add),
            "-" => Some(BinaryOp::Sub),
            "*" => Some(BinaryOp::Mul),
            "/" => Some(BinaryOp::Div),
            "%" => Some(BinaryOp::Rem),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Sqrt,
    Sqr,
    Inv,
}

impl UnaryOp {
    pub const ALL: [UnaryOp; 3] = [UnaryOp::Sqrt, UnaryOp::Sqr, UnaryOp::Inv];

    /// Operation names are matched ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<UnaryOp> {
        UnaryOp::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Sqr => "sqr",
            UnaryOp::Inv => "inv",
        }
    }
}

/// The single operation a line asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr {
    Unary {
        op: UnaryOp,
        operand: Operand,
    },
    Binary {
        lhs: Operand,
        op: BinaryOp,
        rhs: Operand,
    },
}

pub struct Parser<'de> {
    whole: &'de str,
    tokens: Vec<Token<'de>>,
}

impl<'de> Parser<'de> {
    pub fn new(whole: &'de str) -> Self {
        Parser {
            whole,
            tokens: Lexer::new(whole).collect(),
        }
    }

    /// Operands are checked before the operator or operation name.
    pub fn parse_expr(self) -> Result<Expr, CalcError> {
        match self.tokens.as_slice() {
            [name, x] => {
                let operand = Operand::parse(x, self.whole)?;
                let op = UnaryOp::from_name(name.literal).ok_or_else(|| {
                    CalcError::UnknownOperation {
                        op: name.literal.to_string(),
                        src: source(self.whole),
                        span: name.span(),
                    }
                })?;
                Ok(Expr::Unary { op, operand })
            }
            [a, symbol, b] => {
                let lhs = Operand::parse(a, self.whole)?;
                let rhs = Operand::parse(b, self.whole)?;
                let op = BinaryOp::from_symbol(symbol.literal).ok_or_else(|| {
                    CalcError::UnknownOperator {
                        op: symbol.literal.to_string(),
                        src: source(self.whole),
                        span: symbol.span(),
                    }
                })?;
                Ok(Expr::Binary { lhs, op, rhs })
            }
            tokens => Err(CalcError::MalformedExpression {
                found: tokens.len(),
                src: source(self.whole),
                span: SourceSpan::from(0..self.whole.len()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registers(ans: f64, mem: f64) -> Registers {
        Registers { ans, mem }
    }

    #[test]
    fn literals_parse_like_std() {
        for literal in ["0", "42", "-7", "+3", "1.5", "-0.25", ".5", "5.", "1e3", "2.5E-4", "-1e+2"] {
            let expected: f64 = literal.parse().unwrap();
            assert_eq!(resolve(literal, &Registers::default()).unwrap(), expected, "{literal}");
        }
    }

    #[test]
    fn rejects_non_invariant_literals() {
        for literal in ["1,000", "1,5", "inf", "NaN", "-infinity", "0x10", "1e", "e5", ".", "+-1", "1..2", "1_000", "abc", "--1"] {
            let err = resolve(literal, &Registers::default()).unwrap_err();
            assert!(
                matches!(&err, CalcError::UnrecognizedOperand { token, .. } if token == literal),
                "{literal}: {err:?}"
            );
        }
    }

    #[test]
    fn variables_are_snapshots_of_registers() {
        let regs = registers(-3.5, 1e300);
        assert_eq!(resolve("ans", &regs).unwrap(), -3.5);
        assert_eq!(resolve("mem", &regs).unwrap(), 1e300);
        assert_eq!(resolve("ans", &registers(0.0, 0.0)).unwrap(), 0.0);
    }

    #[test]
    fn variable_names_are_case_sensitive() {
        assert!(resolve("ANS", &Registers::default()).is_err());
        assert!(resolve("Mem", &Registers::default()).is_err());
    }

    #[test]
    fn operand_tokens_are_trimmed() {
        assert_eq!(resolve("2\r", &Registers::default()).unwrap(), 2.0);
    }

    #[test]
    fn operator_tables_round_trip() {
        for op in BinaryOp::ALL {
            assert_eq!(BinaryOp::from_symbol(op.symbol()), Some(op));
        }
        for op in UnaryOp::ALL {
            assert_eq!(UnaryOp::from_name(op.name()), Some(op));
            assert_eq!(UnaryOp::from_name(&op.name().to_uppercase()), Some(op));
        }
        assert_eq!(BinaryOp::from_symbol("^"), None);
        assert_eq!(UnaryOp::from_name("sin"), None);
    }

    #[test]
    fn parses_unary_and_binary_lines() {
        let expr = Parser::new("SqRt 16").parse_expr().unwrap();
        assert!(matches!(
            expr,
            Expr::Unary { op: UnaryOp::Sqrt, operand: Operand { atom: Atom::Number(n), .. } } if n == 16.0
        ));

        let expr = Parser::new("ans % -2").parse_expr().unwrap();
        let Expr::Binary { lhs, op, rhs } = expr else {
            panic!("expected a binary expression, got {expr:?}");
        };
        assert_eq!(lhs.atom, Atom::Ans);
        assert_eq!(op, BinaryOp::Rem);
        assert_eq!(rhs.atom, Atom::Number(-2.0));
        assert_eq!(rhs.span, SourceSpan::from(6..8));
    }

    #[test]
    fn wrong_token_count_is_malformed() {
        for line in ["", "5", "1 2 3 4", "1 + 2 + 3"] {
            let err = Parser::new(line).parse_expr().unwrap_err();
            assert!(matches!(err, CalcError::MalformedExpression { .. }), "{line}");
        }
    }

    #[test]
    fn operands_are_checked_before_operators() {
        let err = Parser::new("x ^ 2").parse_expr().unwrap_err();
        assert!(matches!(err, CalcError::UnrecognizedOperand { token, .. } if token == "x"));

        let err = Parser::new("cbrt y").parse_expr().unwrap_err();
        assert!(matches!(err, CalcError::UnrecognizedOperand { token, .. } if token == "y"));
    }

    #[test]
    fn unknown_names_point_at_the_name() {
        let err = Parser::new("2 ^ 3").parse_expr().unwrap_err();
        assert!(matches!(&err, CalcError::UnknownOperator { op, .. } if op == "^"));
        assert_eq!(err.span(), SourceSpan::from(2..3));

        let err = Parser::new("cbrt 8").parse_expr().unwrap_err();
        assert!(matches!(&err, CalcError::UnknownOperation { op, .. } if op == "cbrt"));
        assert_eq!(err.span(), SourceSpan::from(0..4));
    }
}
