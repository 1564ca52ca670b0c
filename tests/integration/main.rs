//! Integration tests for the gradle-unit-test binary

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const INPUT_VARS: &[&str] = &[
        "gradle_file",
        "unit_test_task",
        "gradlew_file_path",
        "unit_test_flags",
        "BITRISE_DEPLOY_DIR",
        "cache_level",
    ];

    fn step() -> Command {
        let mut cmd = cargo_bin_cmd!("gradle-unit-test");
        for var in INPUT_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    fn android_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("project/app/build/intermediates")).unwrap();
        fs::create_dir_all(root.join("home")).unwrap();
        fs::write(root.join("project/build.gradle"), "buildscript {}").unwrap();
        fs::write(root.join("project/app/build.gradle"), "apply plugin: 'com.android.application'").unwrap();
        dir
    }

    #[cfg(unix)]
    fn fake_gradlew(root: &Path, exit_code: i32) {
        fs::write(
            root.join("gradlew"),
            format!("#!/bin/sh\necho \"gradlew $@\"\nexit {exit_code}\n"),
        )
        .unwrap();
    }

    #[test]
    fn help_displays() {
        step()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Gradle caches"));
    }

    #[test]
    fn version_displays() {
        step()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("gradle-unit-test"));
    }

    #[test]
    fn missing_tasks_fails_validation() {
        step()
            .env("gradlew_file_path", "./gradlew")
            .assert()
            .failure()
            .stderr(predicate::str::contains("unit_test_task"));
    }

    #[test]
    fn missing_gradlew_explains_wrapper() {
        step()
            .env("unit_test_task", "test")
            .assert()
            .failure()
            .stderr(predicate::str::contains("no GradlewPath parameter specified"))
            .stderr(predicate::str::contains("gradle_wrapper.html"));
    }

    #[test]
    fn unset_cache_level_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("gradlew"), "").unwrap();

        step()
            .current_dir(dir.path())
            .env("unit_test_task", "test")
            .env("gradlew_file_path", "gradlew")
            .assert()
            .failure()
            .stderr(predicate::str::contains("cache_level: no value specified"));
    }

    #[test]
    fn invalid_cache_level_rejected() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("gradlew"), "").unwrap();

        step()
            .current_dir(dir.path())
            .env("unit_test_task", "test")
            .env("gradlew_file_path", "gradlew")
            .env("cache_level", "everything")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Available options"));
    }

    #[test]
    fn plan_only_deps_json() {
        let dir = android_project();
        let project = dir.path().join("project");
        let home = dir.path().join("home");

        let output = step()
            .args(["plan", "--format", "json", "--cache-level", "only deps"])
            .arg("--project")
            .arg(&project)
            .arg("--home")
            .arg(&home)
            .output()
            .unwrap();
        assert!(output.status.success());

        let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(plan["status"], "ready");
        let includes = plan["paths"]["includes"].as_array().unwrap();
        assert_eq!(includes.len(), 3);
        for include in includes {
            assert_eq!(
                include["key"].as_str().unwrap(),
                project.join("gradle.deps").to_str().unwrap()
            );
        }
        assert_eq!(fs::read_to_string(project.join("gradle.deps")).unwrap().len(), 128);
    }

    #[test]
    fn plan_all_plain_lists_build_dirs() {
        let dir = android_project();
        let project = dir.path().join("project");

        step()
            .args(["plan", "--format", "plain", "--cache-level", "all"])
            .arg("--project")
            .arg(&project)
            .arg("--home")
            .arg(dir.path().join("home"))
            .assert()
            .success()
            .stdout(predicate::str::contains(
                project.join("app/build").to_str().unwrap(),
            ))
            .stdout(predicate::str::contains("build-cache -> "))
            .stdout(predicate::str::contains("!*.apk"));
    }

    #[test]
    fn plan_none_skips() {
        let dir = android_project();

        step()
            .args(["plan", "--cache-level", "none"])
            .arg("--project")
            .arg(dir.path().join("project"))
            .assert()
            .success()
            .stdout(predicate::str::contains("disabled by cache level"));

        assert!(!dir.path().join("project/gradle.deps").exists());
    }

    #[test]
    fn plan_missing_project_is_not_fatal() {
        let dir = TempDir::new().unwrap();

        step()
            .args(["plan", "--format", "json", "--cache-level", "all"])
            .arg("--project")
            .arg(dir.path().join("missing"))
            .arg("--home")
            .arg(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("\"disabled\""));
    }

    #[cfg(unix)]
    #[test]
    fn run_passes_tasks_and_flags() {
        let dir = android_project();
        let project = dir.path().join("project");
        fake_gradlew(&project, 0);

        step()
            .current_dir(&project)
            .env("HOME", dir.path().join("home"))
            .env("unit_test_task", "testDebugUnitTest")
            .env("unit_test_flags", "--stacktrace")
            .env("gradlew_file_path", "./gradlew")
            .env("cache_level", "none")
            .assert()
            .success()
            .stdout(predicate::str::contains("gradlew testDebugUnitTest --stacktrace"));
    }

    #[cfg(unix)]
    #[test]
    fn failed_tests_still_collect_caches() {
        let dir = android_project();
        let project = dir.path().join("project");
        fake_gradlew(&project, 1);

        step()
            .current_dir(&project)
            .env("HOME", dir.path().join("home"))
            .env("unit_test_task", "test")
            .env("gradlew_file_path", "./gradlew")
            .env("cache_level", "only deps")
            .assert()
            .failure()
            .stdout(predicate::str::contains("Collecting gradle caches"));

        assert!(project.join("gradle.deps").exists());
    }
}
