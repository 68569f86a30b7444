//! Arithmetic over an already-substituted, character-safe expression.
//!
//! Grammar (lowest precedence first):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('**' unary)?
//! primary := number | '(' expr ')'
//! number  := digits ['.' digits] | '.' digits | digits '.'
//! ```
//!
//! `**` is right-associative.  Any syntax error, leftover input, nesting
//! deeper than `MAX_DEPTH`, or non-finite result yields `None`.

/// Maximum nesting of parentheses and unary operators.
pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Power,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                // "1.2.3" and a lone "." fail to parse here.
                tokens.push(Token::Number(literal.parse().ok()?));
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push(Token::Power);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            _ => return None,
        }
    }

    Some(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn descend(&mut self) -> Option<()> {
        self.depth += 1;
        (self.depth <= MAX_DEPTH).then_some(())
    }

    fn expr(&mut self) -> Option<f64> {
        let mut acc = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.bump();
                    acc += self.term()?;
                }
                Some(Token::Minus) => {
                    self.bump();
                    acc -= self.term()?;
                }
                _ => return Some(acc),
            }
        }
    }

    fn term(&mut self) -> Option<f64> {
        let mut acc = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.bump();
                    acc *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.bump();
                    acc /= self.unary()?;
                }
                _ => return Some(acc),
            }
        }
    }

    fn unary(&mut self) -> Option<f64> {
        match self.peek() {
            Some(Token::Plus) => {
                self.bump();
                self.descend()?;
                let value = self.unary();
                self.depth -= 1;
                value
            }
            Some(Token::Minus) => {
                self.bump();
                self.descend()?;
                let value = self.unary().map(|v| -v);
                self.depth -= 1;
                value
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Option<f64> {
        let base = self.primary()?;
        if self.peek() == Some(Token::Power) {
            self.bump();
            self.descend()?;
            let exponent = self.unary();
            self.depth -= 1;
            return Some(base.powf(exponent?));
        }
        Some(base)
    }

    fn primary(&mut self) -> Option<f64> {
        match self.bump()? {
            Token::Number(n) => Some(n),
            Token::LParen => {
                self.descend()?;
                let value = self.expr();
                self.depth -= 1;
                match self.bump()? {
                    Token::RParen => value,
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Evaluate a substituted expression.
///
/// The input is expected to contain only digits, whitespace, and `+-*/().`;
/// anything else is rejected here as well.
pub fn evaluate_arithmetic(input: &str) -> Option<f64> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return None;
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;

    if parser.pos != parser.tokens.len() {
        return None;
    }
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::{evaluate_arithmetic, MAX_DEPTH};

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(evaluate_arithmetic("1 + 2 * 3"), Some(7.0));
        assert_eq!(evaluate_arithmetic("(1 + 2) * 3"), Some(9.0));
        assert_eq!(evaluate_arithmetic("10 - 4 - 3"), Some(3.0));
        assert_eq!(evaluate_arithmetic("8 / 4 / 2"), Some(1.0));
        assert_eq!(evaluate_arithmetic("2 ** 3 ** 2"), Some(512.0));
        assert_eq!(evaluate_arithmetic("2 * 3 ** 2"), Some(18.0));
    }

    #[test]
    fn unary_and_decimals() {
        assert_eq!(evaluate_arithmetic("-3 + 5"), Some(2.0));
        assert_eq!(evaluate_arithmetic("3 * -2"), Some(-6.0));
        assert_eq!(evaluate_arithmetic("3 - -2"), Some(5.0));
        assert_eq!(evaluate_arithmetic("+.5 + 5."), Some(5.5));
        assert_eq!(evaluate_arithmetic("2 ** -1"), Some(0.5));
    }

    #[test]
    fn malformed_input_is_none() {
        assert_eq!(evaluate_arithmetic(""), None);
        assert_eq!(evaluate_arithmetic("   "), None);
        assert_eq!(evaluate_arithmetic("(1 + 2"), None);
        assert_eq!(evaluate_arithmetic("1 + 2)"), None);
        assert_eq!(evaluate_arithmetic("1 +"), None);
        assert_eq!(evaluate_arithmetic("3 4"), None);
        assert_eq!(evaluate_arithmetic("1.2.3"), None);
        assert_eq!(evaluate_arithmetic("."), None);
        assert_eq!(evaluate_arithmetic("()"), None);
        assert_eq!(evaluate_arithmetic("(1)(2)"), None);
        assert_eq!(evaluate_arithmetic("1 % 2"), None);
    }

    #[test]
    fn non_finite_results_are_none() {
        assert_eq!(evaluate_arithmetic("1 / 0"), None);
        assert_eq!(evaluate_arithmetic("0 / 0"), None);
    }

    #[test]
    fn nesting_is_bounded() {
        let shallow = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(evaluate_arithmetic(&shallow), Some(1.0));

        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(evaluate_arithmetic(&deep), None);

        let minuses = format!("{}1", "-".repeat(MAX_DEPTH + 1));
        assert_eq!(evaluate_arithmetic(&minuses), None);
    }
}
