//! Four-function calculator state machine
//!
//! Conventional floating-point semantics, with division by zero defined
//! as 0 rather than infinity or NaN.

use serde::{Deserialize, Serialize};

/// Calculator operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

fn apply(op: Operator, first: f64, second: f64) -> f64 {
    match op {
        Operator::Add => first + second,
        Operator::Subtract => first - second,
        Operator::Multiply => first * second,
        Operator::Divide => {
            if second != 0.0 {
                first / second
            } else {
                0.0
            }
        }
    }
}

/// Calculator state: the display string, the pending operator and operand,
/// and whether the next digit starts a fresh operand
#[derive(Debug, Clone)]
pub struct Calculator {
    display: String,
    operator: Option<Operator>,
    previous: Option<f64>,
    waiting_for_operand: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    /// Create a cleared calculator
    pub fn new() -> Self {
        Self {
            display: "0".to_string(),
            operator: None,
            previous: None,
            waiting_for_operand: false,
        }
    }

    /// The current display contents
    pub fn display(&self) -> &str {
        &self.display
    }

    fn display_value(&self) -> f64 {
        self.display.parse::<f64>().unwrap_or(0.0)
    }

    /// Enter a digit (0-9)
    pub fn press_digit(&mut self, digit: u8) {
        let digit = (digit % 10).to_string();
        if self.waiting_for_operand {
            self.display = digit;
            self.waiting_for_operand = false;
        } else if self.display == "0" {
            self.display = digit;
        } else {
            self.display.push_str(&digit);
        }
    }

    /// Enter an operator, evaluating any pending operation first
    pub fn press_operator(&mut self, op: Operator) {
        let input = self.display_value();

        match (self.previous, self.operator) {
            (None, _) => self.previous = Some(input),
            (Some(prev), Some(pending)) => {
                let value = apply(pending, prev, input);
                self.display = format!("{}", value);
                self.previous = Some(value);
            }
            (Some(_), None) => self.previous = Some(input),
        }

        self.waiting_for_operand = true;
        self.operator = Some(op);
    }

    /// Evaluate the pending operation
    pub fn press_equals(&mut self) {
        if let (Some(prev), Some(pending)) = (self.previous, self.operator) {
            let value = apply(pending, prev, self.display_value());
            self.display = format!("{}", value);
            self.previous = Some(value);
        }

        self.waiting_for_operand = true;
        self.operator = None;
    }

    /// Enter the decimal point
    pub fn press_decimal(&mut self) {
        if self.waiting_for_operand {
            self.display = "0.".to_string();
            self.waiting_for_operand = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    /// Flip the sign of the displayed value
    pub fn toggle_sign(&mut self) {
        if self.display != "0" {
            if let Some(rest) = self.display.strip_prefix('-') {
                self.display = rest.to_string();
            } else {
                self.display = format!("-{}", self.display);
            }
        }
    }

    /// Divide the displayed value by 100
    pub fn percent(&mut self) {
        let value = self.display_value() / 100.0;
        self.display = format!("{}", value);
    }

    /// Reset to the cleared state
    pub fn clear(&mut self) {
        self.display = "0".to_string();
        self.operator = None;
        self.previous = None;
        self.waiting_for_operand = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_digits(calc: &mut Calculator, digits: &[u8]) {
        for &d in digits {
            calc.press_digit(d);
        }
    }

    #[test]
    fn adds_two_numbers() {
        let mut calc = Calculator::new();
        press_digits(&mut calc, &[1, 2]);
        calc.press_operator(Operator::Add);
        calc.press_digit(7);
        calc.press_equals();
        assert_eq!(calc.display(), "19");
    }

    #[test]
    fn division_by_zero_is_zero() {
        let mut calc = Calculator::new();
        calc.press_digit(8);
        calc.press_operator(Operator::Divide);
        calc.press_digit(0);
        calc.press_equals();
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn chained_operators_evaluate_left_to_right() {
        let mut calc = Calculator::new();
        calc.press_digit(2);
        calc.press_operator(Operator::Multiply);
        calc.press_digit(3);
        calc.press_operator(Operator::Add);
        assert_eq!(calc.display(), "6");
        calc.press_digit(4);
        calc.press_equals();
        assert_eq!(calc.display(), "10");
    }

    #[test]
    fn decimal_point_is_entered_once() {
        let mut calc = Calculator::new();
        calc.press_digit(1);
        calc.press_decimal();
        calc.press_decimal();
        calc.press_digit(5);
        assert_eq!(calc.display(), "1.5");
    }

    #[test]
    fn sign_toggle_skips_zero() {
        let mut calc = Calculator::new();
        calc.toggle_sign();
        assert_eq!(calc.display(), "0");
        calc.press_digit(5);
        calc.toggle_sign();
        assert_eq!(calc.display(), "-5");
        calc.toggle_sign();
        assert_eq!(calc.display(), "5");
    }

    #[test]
    fn percent_divides_by_one_hundred() {
        let mut calc = Calculator::new();
        press_digits(&mut calc, &[5, 0]);
        calc.percent();
        assert_eq!(calc.display(), "0.5");
    }

    #[test]
    fn digit_after_equals_starts_a_new_entry() {
        let mut calc = Calculator::new();
        calc.press_digit(9);
        calc.press_operator(Operator::Subtract);
        calc.press_digit(4);
        calc.press_equals();
        assert_eq!(calc.display(), "5");
        calc.press_digit(3);
        assert_eq!(calc.display(), "3");
    }

    #[test]
    fn clear_resets_everything() {
        let mut calc = Calculator::new();
        press_digits(&mut calc, &[7, 7]);
        calc.press_operator(Operator::Add);
        calc.clear();
        assert_eq!(calc.display(), "0");
        calc.press_digit(2);
        calc.press_equals();
        assert_eq!(calc.display(), "2");
    }
}
