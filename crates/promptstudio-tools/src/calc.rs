use serde_json::{json, Value};

/// Safely evaluate a mathematical expression.
///
/// Only numbers, parentheses and the operators `+ - * / **` are accepted;
/// errors come back as structured payloads, never as a panic.
pub fn calculate(expression: &str) -> Value {
    let expression = expression.trim();
    if expression.is_empty() {
        return json!({"error": "Expression cannot be empty"});
    }

    match eval(expression) {
        Ok(result) => json!({
            "expression": expression,
            "result": result,
            "formatted": format!("{expression} = {result}"),
        }),
        Err(EvalError::DivisionByZero) => json!({
            "error": "Division by zero",
            "expression": expression,
        }),
        Err(EvalError::Syntax) => json!({
            "error": format!("Invalid mathematical expression: '{expression}'"),
            "expression": expression,
            "hint": "Only basic arithmetic is supported: +, -, *, /, **",
        }),
    }
}

enum EvalError {
    Syntax,
    DivisionByZero,
}

fn eval(input: &str) -> Result<f64, EvalError> {
    let mut parser = Parser {
        chars: input.chars().collect(),
        pos: 0,
    };
    let value = parser.additive()?;
    parser.skip_whitespace();
    if parser.pos != parser.chars.len() {
        return Err(EvalError::Syntax);
    }
    Ok(value)
}

/// Recursive-descent parser with Python-style precedence: `**` binds tighter
/// than unary minus on its base and is right-associative.
struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn additive(&mut self) -> Result<f64, EvalError> {
        let mut value = self.multiplicative()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('+') => {
                    self.pos += 1;
                    value += self.multiplicative()?;
                }
                Some('-') => {
                    self.pos += 1;
                    value -= self.multiplicative()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn multiplicative(&mut self) -> Result<f64, EvalError> {
        let mut value = self.unary()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                // `**` is power, handled below `unary`; a lone `*` is multiply
                Some('*') if self.chars.get(self.pos + 1) != Some(&'*') => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some('/') => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(EvalError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, EvalError> {
        self.skip_whitespace();
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some('+') => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, EvalError> {
        let base = self.primary()?;
        self.skip_whitespace();
        if self.peek() == Some('*') && self.chars.get(self.pos + 1) == Some(&'*') {
            self.pos += 2;
            // Right-associative; the exponent may carry its own sign
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, EvalError> {
        self.skip_whitespace();
        if self.eat('(') {
            let value = self.additive()?;
            if !self.eat(')') {
                return Err(EvalError::Syntax);
            }
            return Ok(value);
        }

        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(EvalError::Syntax);
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse().map_err(|_| EvalError::Syntax)
    }
}
