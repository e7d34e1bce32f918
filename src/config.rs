use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::agenda::Agenda;
use crate::datetime::WeekStart;
use crate::directory::{CompanyForm, Directory};
use crate::error::{Error, ErrorKind, Result};
use crate::event::EventSpec;

const CONFIG_PATH_ENV_VAR: &str = "COMMCAL_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("commcal").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".commcal.toml"));
    }

    locations
}

/// Loads `path` if given, otherwise the first config found in the usual
/// locations, otherwise the built-in sample configuration.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path);
    }

    match find_configfile_locations().into_iter().find(|p| p.is_file()) {
        Some(path) => Config::from_file(&path),
        None => {
            log::info!("No config file found, using built-in sample data");
            Ok(Config::builtin())
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    tick_rate_ms: u64,
    pub week_start: WeekStart,
    pub events: Vec<EventSpec>,
    pub companies: Vec<CompanyForm>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            tick_rate_ms: 500,
            week_start: WeekStart::default(),
            events: Vec::new(),
            companies: Vec::new(),
        }
    }
}

impl FromStr for Config {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config> {
        log::info!("Loading config from '{}'", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            Error::new(
                ErrorKind::IOError(e),
                &format!("could not read '{}'", path.display()),
            )
        })?;

        content.parse::<Config>().map_err(|e| {
            let msg = format!(
                "{} in '{}'",
                e.message.as_deref().unwrap_or_default(),
                path.display()
            );
            e.with_msg(&msg)
        })
    }

    /// Sample data shown when no config file exists.
    pub fn builtin() -> Config {
        let sample = |id: &str, title: &str, date: &str, category: &str, company: &str, note: &str| {
            EventSpec {
                id: id.to_owned(),
                title: title.to_owned(),
                date: date.to_owned(),
                category: category.to_owned(),
                company_name: company.to_owned(),
                note: Some(note.to_owned()),
            }
        };

        Config {
            events: vec![
                sample(
                    "1",
                    "Email - TechCorp",
                    "2024-12-25",
                    "Email",
                    "TechCorp",
                    "Quarterly update discussion",
                ),
                sample(
                    "2",
                    "Call - InnoSys",
                    "2024-12-28",
                    "Phone",
                    "InnoSys",
                    "Follow-up call",
                ),
            ],
            ..Config::default()
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(10))
    }

    pub fn agenda(&self) -> Agenda {
        Agenda::from_specs(self.events.iter().cloned())
    }

    /// Companies from the config. Invalid entries are logged and dropped.
    pub fn directory(&self) -> Directory {
        let mut directory = Directory::new();
        for form in &self.companies {
            if let Err(e) = directory.add(form) {
                log::warn!("Skipping company '{}': {}", form.name, e);
            }
        }
        directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
        tick_rate_ms = 250
        week_start = "monday"

        [[events]]
        id = "1"
        title = "Email - TechCorp"
        date = "2024-12-25"
        type = "Email"
        company = "TechCorp"

        [[events]]
        id = "broken"
        title = "Call - Nowhere"
        date = "someday"
        type = "Phone"
        company = "Nowhere"

        [[companies]]
        name = "TechCorp"
        location = "Berlin"
        email = "hello@techcorp.example"
        phone = "12345"
        periodicity = 14

        [[companies]]
        name = "Incomplete"
    "#;

    #[test]
    fn parses_full_config() {
        let config: Config = SAMPLE.parse().unwrap();
        assert_eq!(config.tick_rate(), Duration::from_millis(250));
        assert_eq!(config.week_start, WeekStart::Monday);

        let agenda = config.agenda();
        assert_eq!(agenda.events().len(), 1);
        assert_eq!(agenda.diagnostics().len(), 1);

        let directory = config.directory();
        assert_eq!(directory.companies().len(), 1);
        assert_eq!(directory.companies()[0].periodicity_days, 14);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config.tick_rate(), Duration::from_millis(500));
        assert_eq!(config.week_start, WeekStart::Sunday);
        assert!(config.events.is_empty());
    }

    #[test]
    fn builtin_has_sample_events() {
        let agenda = Config::builtin().agenda();
        assert_eq!(agenda.events().len(), 2);
        assert!(agenda.diagnostics().is_empty());
    }

    #[test]
    fn bad_week_start_is_rejected() {
        let err = "week_start = \"friday\"".parse::<Config>().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConfigParse));
    }

    #[test]
    fn loads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", SAMPLE).unwrap();

        let config = load_suitable_config(Some(file.path())).unwrap();
        assert_eq!(config.events.len(), 2);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_suitable_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::IOError(_)));
    }
}
