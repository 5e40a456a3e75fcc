//! Behavioural tests for layered configuration loading.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use policy_analyzer_config::Config;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

const BUILD_CONFIGURATION_VAR: &str = "PULUMI_POLICY_DOTNET_BUILD_CONFIGURATION";
const CONFIG_PATH_VAR: &str = "PULUMI_POLICY_DOTNET_CONFIG_PATH";

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct Harness {
    temp_dir: TempDir,
    cli_args: RefCell<Vec<OsString>>,
    env_overrides: RefCell<Vec<(String, Option<OsString>)>>,
    loaded: RefCell<Option<Config>>,
    error: RefCell<Option<String>>,
    _guard: MutexGuard<'static, ()>,
}

impl Harness {
    fn new() -> Self {
        let guard = ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let temp_dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(error) => panic!("failed to create temporary directory: {error}"),
        };
        let harness = Self {
            temp_dir,
            cli_args: RefCell::new(vec![OsString::from("pulumi-analyzer-policy-dotnet")]),
            env_overrides: RefCell::new(Vec::new()),
            loaded: RefCell::new(None),
            error: RefCell::new(None),
            _guard: guard,
        };
        harness.clear_env(BUILD_CONFIGURATION_VAR);
        harness.clear_env(CONFIG_PATH_VAR);
        harness
    }

    fn write_config(&self, build_configuration: &str) {
        let path = self.temp_dir.path().join("policy-dotnet.toml");
        let toml = format!("build_configuration = \"{build_configuration}\"\n");
        if let Err(error) = fs::write(&path, toml) {
            panic!("failed to write configuration: {error}");
        }
        self.push_cli_arg("--config-path");
        self.push_cli_arg(path.into_os_string());
    }

    fn remember(&self, key: &str) {
        let previous = std::env::var_os(key);
        self.env_overrides
            .borrow_mut()
            .push((key.to_owned(), previous));
    }

    fn clear_env(&self, key: &str) {
        self.remember(key);
        // Environment mutation is `unsafe` on edition 2024. The harness holds
        // ENV_MUTEX and restores every override in `Drop`.
        unsafe { std::env::remove_var(key) };
    }

    fn set_env(&self, key: &str, value: &str) {
        self.remember(key);
        unsafe { std::env::set_var(key, value) };
    }

    fn push_cli_arg(&self, arg: impl Into<OsString>) {
        self.cli_args.borrow_mut().push(arg.into());
    }

    fn load(&self) {
        if self.loaded.borrow().is_some() || self.error.borrow().is_some() {
            return;
        }

        let args = self.cli_args.borrow().clone();
        match Config::load_from_args(args) {
            Ok(config) => *self.loaded.borrow_mut() = Some(config),
            Err(error) => *self.error.borrow_mut() = Some(error.to_string()),
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let mut overrides = self.env_overrides.borrow_mut();
        while let Some((key, value)) = overrides.pop() {
            match value {
                Some(os_value) => unsafe { std::env::set_var(&key, os_value) },
                None => unsafe { std::env::remove_var(&key) },
            }
        }
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

#[given("a configuration file setting the build configuration to {value}")]
fn given_configuration_file(harness: &Harness, value: String) {
    harness.write_config(value.trim_matches('"'));
}

#[given("the environment sets the build configuration to {value}")]
fn given_environment(harness: &Harness, value: String) {
    harness.set_env(BUILD_CONFIGURATION_VAR, value.trim_matches('"'));
}

#[given("the analyzer host passes its engine address")]
fn given_host_arguments(harness: &Harness) {
    harness.push_cli_arg("127.0.0.1:51234");
    harness.push_cli_arg("--tracing");
}

#[when("the command line sets the build configuration to {value}")]
fn when_cli_override(harness: &Harness, value: String) {
    harness.push_cli_arg("--build-configuration");
    harness.push_cli_arg(value.trim_matches('"'));
}

#[when("the configuration loads without overrides")]
fn when_load_without_overrides(harness: &Harness) {
    harness.load();
}

#[then("the build configuration resolves to {value}")]
fn then_resolved(harness: &Harness, value: String) {
    harness.load();

    if let Some(error) = harness.error.borrow().as_ref() {
        panic!("configuration failed to load: {error}");
    }

    let loaded = harness.loaded.borrow();
    let Some(config) = loaded.as_ref() else {
        panic!("configuration was not loaded");
    };
    assert_eq!(config.build_configuration(), value.trim_matches('"'));
    assert_eq!(config.dotnet_executable(), "dotnet");
}

#[scenario(path = "tests/features/configuration_precedence.feature")]
fn configuration_precedence(harness: Harness) {
    let _ = harness;
}
