use crate::config::toml_config::RaiseConfig;
use crate::core::calculator::{parse_inflation, parse_salary};
use crate::domain::model::SalaryInput;
use crate::utils::error::CalculationError;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "real-raise")]
#[command(about = "Evaluate a salary raise against inflation and the USD/EUR exchange rates")]
pub struct CliConfig {
    /// Current monthly salary in TRY (thousand separators allowed, e.g. 100.000)
    #[arg(long)]
    pub current: String,

    /// Proposed monthly salary in TRY
    #[arg(long)]
    pub proposed: String,

    /// Annual inflation in percent; defaults to the configured value
    #[arg(long, allow_hyphen_values = true, conflicts_with = "no_inflation")]
    pub inflation: Option<String>,

    /// Skip the inflation comparison
    #[arg(long)]
    pub no_inflation: bool,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the FX provider base URL
    #[arg(long)]
    pub api_base: Option<String>,

    /// Keep session rates in this JSON file across invocations
    #[arg(long)]
    pub session_file: Option<String>,

    /// Discard session rates and fetch fresh ones
    #[arg(long)]
    pub refresh: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Load the file configuration (if any) and layer the flags on top.
    pub fn load_config(&self) -> crate::Result<RaiseConfig> {
        let mut config = match &self.config {
            Some(path) => RaiseConfig::from_file(path)?,
            None => RaiseConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut RaiseConfig) {
        if let Some(api_base) = &self.api_base {
            config.provider.base_url = Some(api_base.clone());
        }
        if let Some(session_file) = &self.session_file {
            config.session.path = Some(session_file.clone());
        }
    }

    /// Inflation actually used: none when disabled or unparseable.
    pub fn resolve_inflation(&self, default_inflation: Option<f64>) -> Option<f64> {
        if self.no_inflation {
            return None;
        }
        match &self.inflation {
            Some(text) => parse_inflation(text),
            None => default_inflation,
        }
    }

    pub fn salary_input(
        &self,
        default_inflation: Option<f64>,
    ) -> std::result::Result<SalaryInput, CalculationError> {
        Ok(SalaryInput::new(
            parse_salary(&self.current)?,
            parse_salary(&self.proposed)?,
            self.resolve_inflation(default_inflation),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    fn parse(args: &[&str]) -> CliConfig {
        let mut argv = vec!["real-raise"];
        argv.extend_from_slice(args);
        CliConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_salary_input_with_default_inflation() {
        let cli = parse(&["--current", "100.000", "--proposed", "110.000"]);
        let input = cli.salary_input(Some(31.07)).unwrap();

        assert_eq!(input.current_salary, 100_000.0);
        assert_eq!(input.proposed_salary, 110_000.0);
        assert_eq!(input.inflation_rate, Some(31.07));
    }

    #[test]
    fn test_inflation_flags() {
        let explicit = parse(&["--current", "1", "--proposed", "2", "--inflation", "-1,5"]);
        assert_eq!(explicit.resolve_inflation(Some(31.07)), Some(-1.5));

        let garbage = parse(&["--current", "1", "--proposed", "2", "--inflation", "n/a"]);
        assert_eq!(garbage.resolve_inflation(Some(31.07)), None);

        let disabled = parse(&["--current", "1", "--proposed", "2", "--no-inflation"]);
        assert_eq!(disabled.resolve_inflation(Some(31.07)), None);
    }

    #[test]
    fn test_invalid_salary_text() {
        let cli = parse(&["--current", "none", "--proposed", "110.000"]);
        assert_eq!(cli.salary_input(None), Err(CalculationError::InvalidSalary));
    }

    #[test]
    fn test_flags_override_file_config() {
        let cli = parse(&[
            "--current",
            "1",
            "--proposed",
            "2",
            "--api-base",
            "http://127.0.0.1:9000",
            "--session-file",
            "/tmp/session.json",
        ]);
        let config = cli.load_config().unwrap();

        assert_eq!(config.api_base(), "http://127.0.0.1:9000");
        assert_eq!(config.session_path(), Some("/tmp/session.json"));
    }
}
