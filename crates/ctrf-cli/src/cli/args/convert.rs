//! Convert command arguments.

use std::path::PathBuf;

use clap::Parser;
use ctrf_core::{Environment, ReporterOptions};

#[derive(Parser, Clone, Debug)]
pub struct ConvertArgs {
    /// Serialized result tree: a JSON array of nodes or {"files": [...], "errors": [...]}.
    /// Use "-" to read stdin.
    pub input: PathBuf,

    /// Reporter options file (.json, otherwise YAML)
    #[arg(long, env = "CTRF_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "CTRF_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Report file name; ".json" is appended when missing
    #[arg(long, env = "CTRF_OUTPUT_FILE")]
    pub output_file: Option<String>,

    /// Omit message/trace/rawStatus/type/filePath/retries from test records
    #[arg(long, env = "CTRF_MINIMAL")]
    pub minimal: bool,

    /// Category label stamped on every test (default: unit)
    #[arg(long, env = "CTRF_TEST_TYPE")]
    pub test_type: Option<String>,

    /// results.tool.name (default: vitest)
    #[arg(long, env = "CTRF_TOOL_NAME")]
    pub tool_name: Option<String>,

    /// Do not print the console summary
    #[arg(long, short)]
    pub quiet: bool,

    #[command(flatten)]
    pub environment: EnvironmentArgs,
}

/// Build/environment metadata for the report's environment block.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct EnvironmentArgs {
    #[arg(long, env = "CTRF_APP_NAME")]
    pub app_name: Option<String>,
    #[arg(long, env = "CTRF_APP_VERSION")]
    pub app_version: Option<String>,
    #[arg(long, env = "CTRF_OS_PLATFORM")]
    pub os_platform: Option<String>,
    #[arg(long, env = "CTRF_OS_RELEASE")]
    pub os_release: Option<String>,
    #[arg(long, env = "CTRF_OS_VERSION")]
    pub os_version: Option<String>,
    #[arg(long, env = "CTRF_BUILD_NAME")]
    pub build_name: Option<String>,
    #[arg(long, env = "CTRF_BUILD_NUMBER")]
    pub build_number: Option<String>,
    #[arg(long, env = "CTRF_BUILD_URL")]
    pub build_url: Option<String>,
    #[arg(long, env = "CTRF_REPOSITORY_NAME")]
    pub repository_name: Option<String>,
    #[arg(long, env = "CTRF_REPOSITORY_URL")]
    pub repository_url: Option<String>,
    #[arg(long, env = "CTRF_BRANCH_NAME")]
    pub branch_name: Option<String>,
    #[arg(long, env = "CTRF_TEST_ENVIRONMENT")]
    pub test_environment: Option<String>,
}

impl ConvertArgs {
    /// Flags win over values from the options file.
    pub fn apply_overrides(&self, options: &mut ReporterOptions) {
        if let Some(dir) = &self.output_dir {
            options.output_dir = dir.clone();
        }
        if let Some(file) = &self.output_file {
            options.output_file = file.clone();
        }
        if self.minimal {
            options.minimal = true;
        }
        if let Some(t) = &self.test_type {
            options.test_type = t.clone();
        }
        if let Some(name) = &self.tool_name {
            options.tool_name = name.clone();
        }
        self.environment.merge_into(&mut options.environment);
    }
}

impl EnvironmentArgs {
    fn merge_into(&self, env: &mut Environment) {
        fn set(slot: &mut Option<String>, value: &Option<String>) {
            if value.is_some() {
                slot.clone_from(value);
            }
        }
        set(&mut env.app_name, &self.app_name);
        set(&mut env.app_version, &self.app_version);
        set(&mut env.os_platform, &self.os_platform);
        set(&mut env.os_release, &self.os_release);
        set(&mut env.os_version, &self.os_version);
        set(&mut env.build_name, &self.build_name);
        set(&mut env.build_number, &self.build_number);
        set(&mut env.build_url, &self.build_url);
        set(&mut env.repository_name, &self.repository_name);
        set(&mut env.repository_url, &self.repository_url);
        set(&mut env.branch_name, &self.branch_name);
        set(&mut env.test_environment, &self.test_environment);
    }
}
