// tests/cli_run.rs

use std::error::Error;
use std::path::{Path, PathBuf};

use tabledump::cli::CliArgs;
use tabledump::errors::DumpError;
use tabledump::{BackupRequest, DumpTool, render_dry_run, run};
use tabledump_test_utils::{init_tracing, with_deadline};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(dir: &Path, tool_section: &str) -> std::io::Result<PathBuf> {
    let path = dir.join("Tabledump.toml");
    std::fs::write(
        &path,
        format!(
            r#"
tables = ["customers", {{ table = "orders", where = "status='open'" }}]

[connection]
database = "shop"
password = "hunter2"

[options]
compact = true

{tool_section}
"#
        ),
    )?;
    Ok(path)
}

fn args(config: &Path, out_dir: &Path) -> CliArgs {
    CliArgs {
        config: config.to_string_lossy().into_owned(),
        name: None,
        out_dir: Some(out_dir.to_string_lossy().into_owned()),
        tool: None,
        log_level: None,
        dry_run: false,
    }
}

#[tokio::test]
async fn dry_run_spawns_nothing_and_writes_nothing() -> TestResult {
    init_tracing();

    let tmp = TempDir::new()?;
    let config = write_config(tmp.path(), "")?;
    let out_dir = tmp.path().join("out");

    let result = with_deadline(run(CliArgs {
        dry_run: true,
        tool: Some("/nonexistent/mysqldump".to_string()),
        ..args(&config, &out_dir)
    }))
    .await?;

    assert_eq!(result, None);
    assert!(!out_dir.exists());
    Ok(())
}

#[tokio::test]
async fn missing_tool_without_dry_run_is_a_spawn_error() -> TestResult {
    init_tracing();

    let tmp = TempDir::new()?;
    let config = write_config(tmp.path(), "")?;
    let out_dir = tmp.path().join("out");

    let result = with_deadline(run(CliArgs {
        tool: Some("/nonexistent/mysqldump".to_string()),
        ..args(&config, &out_dir)
    }))
    .await;

    assert!(matches!(result, Err(DumpError::Spawn { .. })), "{result:?}");
    assert!(!out_dir.join("dump.sql").exists());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn configured_tool_and_name_override_produce_the_dump() -> TestResult {
    init_tracing();

    let tmp = TempDir::new()?;
    let config = write_config(
        tmp.path(),
        r#"[tool]
program = "sh"
args = ["-c", 'for a in "$@"; do last=$a; done; echo "-- $last"', "mysqldump"]"#,
    )?;
    let out_dir = tmp.path().join("out");

    let path = with_deadline(run(CliArgs {
        name: Some("nightly".to_string()),
        ..args(&config, &out_dir)
    }))
    .await?;

    let path = path.expect("non dry-run returns the written path");
    assert_eq!(path, out_dir.join("nightly.sql"));
    assert_eq!(std::fs::read_to_string(&path)?, "-- customers\n-- status='open'\n");
    Ok(())
}

#[test]
fn dry_run_listing_masks_the_password() -> TestResult {
    let request = BackupRequest::new("shop", "hunter2")
        .with_table("customers")
        .with_table(("orders", "status='open'"))
        .with_tool(DumpTool::new("docker").with_args(["exec", "db", "mysqldump"]));

    let listing = render_dry_run(&request, Path::new("dump"), "shop")?;

    assert!(!listing.contains("hunter2"));
    let output_line = format!("output   = {}", Path::new("dump").join("shop.sql").display());
    assert!(listing.contains(&output_line));
    assert!(listing.contains("invocations (2):"));
    assert!(listing.contains("docker exec db mysqldump -u root -p**** shop customers"));
    assert!(listing.contains("docker exec db mysqldump -u root -p**** shop orders -w status='open'"));
    Ok(())
}
