//! Sample service classes used by the integration tests.

use std::fmt;

pub struct Calculator {
    memory: i64,
}

impl Calculator {
    /**
     * Add two numbers.
     *
     * @param int $a first
     * @param int $b second
     * @return int sum
     */
    pub fn add(&self, a: i64, b: i64) -> i64 {
        a + b
    }

    /**
     * Divide two numbers.
     *
     * @param float $dividend what gets divided
     * @param float $divisor what it is divided by
     * @return float quotient
     */
    pub fn divide(&self, dividend: f64, divisor: f64) -> f64 {
        dividend / divisor
    }

    /**
     * Forget the stored value.
     */
    pub fn clear(&mut self) {
        self.memory = 0;
    }

    fn internal(&self) -> i64 {
        self.memory
    }
}

impl fmt::Display for Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Calculator {{ memory: {} }}", self.memory)
    }
}

pub struct Echo;

impl Echo {
    /// Usage text.
    ///
    /// @return string
    pub fn banner(&self) -> &'static str {
        "usage: echo {
    text
"
    }

    /// Echo the text back.
    ///
    /// @param string $text what to echo
    /// @param array $tags labels
    /// @return string
    pub fn echo(&self, text: &str) -> String {
        text.to_string()
    }
}
