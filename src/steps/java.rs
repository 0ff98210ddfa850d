//! Java runtime precondition.

use crate::context::ExecutionContext;
use crate::error::{ProvisionError, Result};
use crate::runtime::JavaVersion;
use crate::shell::{CommandRunner, CommandSpec};
use crate::ui::UserInterface;

/// Check that `java` resolves and is at least `min_java_major`.
///
/// Returns the parsed version on success. The version report is read from
/// stderr (where `java -version` prints it), falling back to stdout.
pub fn verify_java(
    ctx: &ExecutionContext,
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
) -> Result<JavaVersion> {
    let required = ctx.config.min_java_major;
    let java = ctx
        .resolve("java")
        .ok_or(ProvisionError::MissingRuntime { required })?;
    tracing::debug!("Using java at {}", java.display());

    let spec = CommandSpec::new(java.to_string_lossy()).arg("-version").captured();
    let result = runner.run(&spec).map_err(|e| {
        tracing::debug!("{} could not be started: {}", java.display(), e);
        ProvisionError::MissingRuntime { required }
    })?;
    if !result.success {
        return Err(ProvisionError::MissingRuntime { required });
    }

    let report = if result.stderr.trim().is_empty() {
        &result.stdout
    } else {
        &result.stderr
    };
    let version = JavaVersion::from_report(report)?;
    check_minimum(version, required)?;

    ui.success(&format!("Java {} ({})", version, java.display()));
    Ok(version)
}

/// Compare a parsed version against the required major.
pub fn check_minimum(version: JavaVersion, required: u32) -> Result<()> {
    if version.major < required {
        Err(ProvisionError::VersionTooLow {
            found: version.major,
            required,
        })
    } else {
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::{ProvisionConfig, Variant};
    use crate::shell::MockRunner;
    use crate::ui::MockUI;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn context_with_java(min: u32) -> (TempDir, ExecutionContext) {
        let temp = TempDir::new().unwrap();
        let java = temp.path().join("java");
        fs::write(&java, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&java, fs::Permissions::from_mode(0o755)).unwrap();
        let config = ProvisionConfig {
            min_java_major: min,
            ..Default::default()
        };
        let ctx = ExecutionContext::new(config, Variant::Basic, 0, vec![temp.path().to_path_buf()]);
        (temp, ctx)
    }

    #[test]
    fn missing_java_is_missing_runtime() {
        let temp = TempDir::new().unwrap();
        let ctx = ExecutionContext::new(
            ProvisionConfig::default(),
            Variant::Basic,
            0,
            vec![temp.path().to_path_buf()],
        );
        let runner = MockRunner::new();
        let mut ui = MockUI::new();

        let err = verify_java(&ctx, &runner, &mut ui).unwrap_err();

        assert!(matches!(err, ProvisionError::MissingRuntime { required: 17 }));
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn equal_to_minimum_succeeds() {
        let (_temp, ctx) = context_with_java(17);
        let runner = MockRunner::new();
        runner.succeed_with_stderr("", "openjdk version \"17.0.10\" 2024-01-16\n");
        let mut ui = MockUI::new();

        let version = verify_java(&ctx, &runner, &mut ui).unwrap();

        assert_eq!(version, JavaVersion::new(17, 0, 10));
        assert!(ui.has_success("Java 17.0.10"));
        assert!(runner.commands()[0].ends_with("java -version"));
    }

    #[test]
    fn below_minimum_is_too_low() {
        let (_temp, ctx) = context_with_java(17);
        let runner = MockRunner::new();
        runner.succeed_with_stderr("", "openjdk version \"11.0.22\" 2024-01-16\n");
        let mut ui = MockUI::new();

        let err = verify_java(&ctx, &runner, &mut ui).unwrap_err();

        assert!(matches!(
            err,
            ProvisionError::VersionTooLow {
                found: 11,
                required: 17
            }
        ));
    }

    #[test]
    fn legacy_version_is_too_low() {
        let (_temp, ctx) = context_with_java(17);
        let runner = MockRunner::new();
        runner.succeed_with_stderr("", "java version \"1.8.0_392\"\n");
        let mut ui = MockUI::new();

        let err = verify_java(&ctx, &runner, &mut ui).unwrap_err();

        assert!(matches!(err, ProvisionError::VersionTooLow { found: 1, .. }));
    }

    #[test]
    fn unparseable_report_is_malformed() {
        let (_temp, ctx) = context_with_java(17);
        let runner = MockRunner::new();
        runner.succeed_with_stderr("", "Picked up JAVA_TOOL_OPTIONS\n");
        let mut ui = MockUI::new();

        let err = verify_java(&ctx, &runner, &mut ui).unwrap_err();

        match err {
            ProvisionError::MalformedVersion { report } => {
                assert_eq!(report, "Picked up JAVA_TOOL_OPTIONS")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn failing_java_is_missing_runtime() {
        let (_temp, ctx) = context_with_java(17);
        let runner = MockRunner::new();
        runner.fail("", 1);
        let mut ui = MockUI::new();

        let err = verify_java(&ctx, &runner, &mut ui).unwrap_err();

        assert!(matches!(err, ProvisionError::MissingRuntime { .. }));
    }

    struct UnstartableRunner;

    impl CommandRunner for UnstartableRunner {
        fn run(&self, _spec: &CommandSpec) -> Result<crate::shell::CommandResult> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "bad interpreter").into())
        }
    }

    #[test]
    fn unstartable_java_is_missing_runtime() {
        let (_temp, ctx) = context_with_java(17);
        let mut ui = MockUI::new();

        let err = verify_java(&ctx, &UnstartableRunner, &mut ui).unwrap_err();

        assert!(matches!(err, ProvisionError::MissingRuntime { required: 17 }));
    }

    #[test]
    fn check_minimum_boundaries() {
        assert!(check_minimum(JavaVersion::new(16, 9, 9), 17).is_err());
        assert!(check_minimum(JavaVersion::new(17, 0, 0), 17).is_ok());
        assert!(check_minimum(JavaVersion::new(21, 0, 0), 17).is_ok());
    }
}
