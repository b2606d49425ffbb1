//! Parser configuration.

use crate::error::SparkdownError;
use crate::rules::TokenRules;
use crate::window::DEFAULT_WINDOW_CAPACITY;

/// Settings shared by every parse that uses them.
///
/// The rule table is built once here and borrowed by each tokenizer.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    window_capacity: usize,
    rules: TokenRules,
}

impl ParserConfig {
    /// Validate and build a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SparkdownError::WindowTooSmall`] if the window cannot hold the
    /// longest run in `rules`.
    pub fn new(window_capacity: usize, rules: TokenRules) -> Result<Self, SparkdownError> {
        let required = rules.longest_run();
        if window_capacity < required {
            return Err(SparkdownError::WindowTooSmall {
                capacity: window_capacity,
                required,
            });
        }
        Ok(Self {
            window_capacity,
            rules,
        })
    }

    /// Same rules, different window.
    ///
    /// # Errors
    ///
    /// Returns [`SparkdownError::WindowTooSmall`] if `window_capacity` is below
    /// the longest run in the current rules.
    pub fn with_window_capacity(self, window_capacity: usize) -> Result<Self, SparkdownError> {
        Self::new(window_capacity, self.rules)
    }

    /// Characters held before scanning starts; also the longest run accepted.
    #[must_use]
    pub const fn window_capacity(&self) -> usize {
        self.window_capacity
    }

    /// The grammar.
    #[must_use]
    pub const fn rules(&self) -> &TokenRules {
        &self.rules
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            rules: TokenRules::sparkdown(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fits_the_grammar() {
        let config = ParserConfig::default();
        assert_eq!(config.window_capacity(), 6);
        assert!(config.window_capacity() >= config.rules().longest_run());
    }

    #[test]
    fn rejects_a_window_shorter_than_a_rule() {
        let err = ParserConfig::default().with_window_capacity(4).unwrap_err();
        assert!(matches!(
            err,
            SparkdownError::WindowTooSmall {
                capacity: 4,
                required: 6
            }
        ));
    }

    #[test]
    fn accepts_a_larger_window() {
        let config = ParserConfig::default().with_window_capacity(9).unwrap();
        assert_eq!(config.window_capacity(), 9);
    }
}
