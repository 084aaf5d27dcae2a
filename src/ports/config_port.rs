//! Configuration access port trait.
//!
//! Typed getters are strict: an absent key is `Ok(None)`, a present key that
//! does not parse is `ConfigInvalid` naming the section and key.

use crate::domain::error::StratbenchError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_number(&self, section: &str, key: &str) -> Result<Option<f64>, StratbenchError>;
    fn get_count(&self, section: &str, key: &str) -> Result<Option<usize>, StratbenchError>;
    fn get_flag(&self, section: &str, key: &str) -> Result<Option<bool>, StratbenchError>;
}
