use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_enrollbook"))
}

/// Write a config file that points the store into `dir`.
fn write_config(dir: &Path, extra: &str) -> PathBuf {
    let config_path = dir.join("config.toml");
    let db_path = dir.join("data").join("users.db");
    let contents = format!(
        "[storage]\ndatabase_path = {:?}\n{extra}",
        db_path.display().to_string()
    );
    std::fs::write(&config_path, contents).expect("write config");
    config_path
}

fn run(config: &Path, args: &[&str]) -> Output {
    Command::new(bin())
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run enrollbook")
}

fn run_with_env(config: &Path, args: &[&str], key: &str, value: &str) -> Output {
    Command::new(bin())
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .env(key, value)
        .output()
        .expect("run enrollbook")
}

fn register_ann(config: &Path) -> Output {
    run(
        config,
        &[
            "register",
            "--no-input",
            "--first-name",
            "Ann",
            "--last-name",
            "Lee",
            "--password",
            "pw123",
            "--dob",
            "2000-01-01",
            "--gender",
            "female",
            "--location",
            "Earth",
            "--postal-code",
            "000000",
            "--state",
            "Nowhere",
            "--country",
            "Wonderland",
            "--agree",
        ],
    )
}

#[test]
fn test_register_then_show() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_config(dir.path(), "");

    let output = register_ann(&config);
    assert!(output.status.success(), "register failed: {output:?}");
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Registered user #1");

    let output = run(&config, &["show"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("User #1"));
    assert!(stdout.contains("Date Of Birth:  1 January, 2000"));
    assert!(stdout.contains("Password:  *****"));
    assert!(!stdout.contains("pw123"));

    let output = run(&config, &["show", "--show-password"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Password:  pw123"));
}

#[test]
fn test_show_json() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_config(dir.path(), "");
    assert!(register_ann(&config).status.success());

    let output = run(&config, &["show", "--json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["id"], 1);
    assert_eq!(value["first_name"], "Ann");
    assert_eq!(value["password"], "*****");
    assert!(value["photo"].is_null());
}

#[test]
fn test_show_on_empty_store_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_config(dir.path(), "");

    let output = run(&config, &["show"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No registrations yet."));
}

#[test]
fn test_validation_message_is_printed_plainly() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_config(dir.path(), "");

    let output = run(
        &config,
        &["register", "--no-input", "--first-name", "Ann", "--agree"],
    );
    assert!(!output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stderr).trim(),
        "Please select a gender"
    );
}

#[test]
fn test_mask_password_from_config() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_config(dir.path(), "\n[display]\nmask_password = false\n");
    assert!(register_ann(&config).status.success());

    let output = run(&config, &["show"]);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Password:  pw123"));
}

#[test]
fn test_db_migrate_requires_confirmation() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_config(dir.path(), "");
    assert!(register_ann(&config).status.success());

    let output = run(&config, &["db", "migrate"]);
    assert!(!output.status.success());

    let output = run(&config, &["db", "migrate", "--yes"]);
    assert!(output.status.success());

    let output = run(&config, &["db", "status", "--json"]);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["registrations"], 0);
    assert_eq!(value["schema_version"], 1);
}

#[test]
fn test_export_photo() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_config(dir.path(), "");

    let photo = dir.path().join("me.png");
    image::DynamicImage::new_rgb8(3, 2)
        .save(&photo)
        .expect("write photo");

    let output = run(
        &config,
        &[
            "register",
            "--no-input",
            "--first-name",
            "Ann",
            "--last-name",
            "Lee",
            "--password",
            "pw",
            "--dob",
            "2000-01-01",
            "--gender",
            "female",
            "--location",
            "Earth",
            "--postal-code",
            "000000",
            "--state",
            "Nowhere",
            "--country",
            "Wonderland",
            "--photo",
            photo.to_str().unwrap(),
            "--agree",
        ],
    );
    assert!(output.status.success(), "register failed: {output:?}");

    let exported = dir.path().join("out.png");
    let output = run(
        &config,
        &["show", "--export-photo", exported.to_str().unwrap()],
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Photo:  3x2"));
    assert_eq!(image::image_dimensions(&exported).unwrap(), (3, 2));
}

#[test]
fn test_env_var_overrides_config_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_config(dir.path(), "\n[display]\nmask_password = true\n");
    assert!(register_ann(&config).status.success());

    let output = run_with_env(
        &config,
        &["show"],
        "ENROLLBOOK_DISPLAY__MASK_PASSWORD",
        "false",
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Password:  pw123"));
}

#[test]
fn test_config_validate_reports_broken_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_config(dir.path(), "");

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "garbage = [\n").expect("write broken config");

    let output = run(
        &config,
        &["config", "validate", "--file", broken.to_str().unwrap()],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration error"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Configuration is valid."));

    let output = run(
        &config,
        &["config", "validate", "--file", config.to_str().unwrap()],
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Configuration is valid."));
}
