//! INI configuration adapter.
//!
//! Sections and keys are case-insensitive. Typed values go through the
//! parser's own conversions and a value that fails to convert is reported
//! against its `[section] key`, never replaced by a default.

use crate::domain::error::StratbenchError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    ini: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StratbenchError> {
        let path = path.as_ref();
        let mut ini = Ini::new();
        ini.load(path).map_err(|reason| StratbenchError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { ini })
    }

    pub fn from_string(content: &str) -> Result<Self, StratbenchError> {
        let mut ini = Ini::new();
        ini.read(content.to_string())
            .map_err(|reason| StratbenchError::ConfigParse {
                file: "<inline>".to_string(),
                reason,
            })?;
        Ok(Self { ini })
    }

    fn rejected(&self, section: &str, key: &str, expected: &str) -> StratbenchError {
        let raw = self.ini.get(section, key).unwrap_or_default();
        StratbenchError::config_invalid(section, key, format!("'{}' is not {}", raw, expected))
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.ini.get(section, key)
    }

    fn get_number(&self, section: &str, key: &str) -> Result<Option<f64>, StratbenchError> {
        self.ini
            .getfloat(section, key)
            .map_err(|_| self.rejected(section, key, "a number"))
    }

    fn get_count(&self, section: &str, key: &str) -> Result<Option<usize>, StratbenchError> {
        let value = self
            .ini
            .getuint(section, key)
            .map_err(|_| self.rejected(section, key, "a non-negative integer"))?;
        value
            .map(|v| usize::try_from(v).map_err(|_| self.rejected(section, key, "in range")))
            .transpose()
    }

    /// Accepts the usual spellings (`true`/`false`, `yes`/`no`, `on`/`off`,
    /// `1`/`0`) in any case.
    fn get_flag(&self, section: &str, key: &str) -> Result<Option<bool>, StratbenchError> {
        self.ini
            .getboolcoerce(section, key)
            .map_err(|_| self.rejected(section, key, "a boolean"))
    }
}
