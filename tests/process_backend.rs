// tests/process_backend.rs
//
// These run real child processes. The "dump tool" is `sh -c '<script>'
// mysqldump`, so `$@` inside the script is exactly the generated argument
// list.

#![cfg(unix)]

use std::error::Error;
use std::io;
use std::time::Duration;

use tabledump::command::build_commands;
use tabledump::config::DumpTool;
use tabledump::errors::DumpError;
use tabledump::exec::{DumpBackend, Invocation, ProcessBackend};
use tabledump::{Backup, BackupRequest};
use tabledump_test_utils::{init_tracing, script_tool, with_deadline};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn first_invocation(request: &BackupRequest) -> Invocation {
    let spec = build_commands(request)
        .expect("valid request")
        .into_iter()
        .next()
        .expect("at least one command");
    Invocation {
        index: 0,
        tool: request.tool.clone(),
        spec,
        timeout: None,
    }
}

#[tokio::test]
async fn arguments_reach_the_tool_verbatim() -> TestResult {
    init_tracing();

    let request = BackupRequest::new("shop", "x")
        .with_table(("orders", "status='open' AND note = \"a b\""))
        .with_tool(script_tool(r#"for a in "$@"; do printf '[%s]' "$a"; done"#));

    let output = with_deadline(ProcessBackend.run(first_invocation(&request))).await?;

    assert_eq!(
        String::from_utf8(output.stdout)?,
        r#"[-u][root][-px][shop][orders][-w][status='open' AND note = "a b"]"#
    );
    assert_eq!(output.code, Some(0));
    Ok(())
}

#[tokio::test]
async fn stdout_and_stderr_are_captured_separately() -> TestResult {
    init_tracing();

    let request = BackupRequest::new("shop", "x").with_tool(script_tool(
        "echo 'mysqldump: [Warning] Using a password on the command line interface can be insecure.' >&2; \
         echo '-- MySQL dump'; echo 'CREATE TABLE t (id int);'",
    ));

    let output = with_deadline(ProcessBackend.run(first_invocation(&request))).await?;

    assert_eq!(output.stdout, b"-- MySQL dump\nCREATE TABLE t (id int);\n");
    assert!(output.stderr.contains("[Warning]"));
    Ok(())
}

#[tokio::test]
async fn large_output_does_not_deadlock() -> TestResult {
    init_tracing();

    // Well past the pipe buffer on both streams.
    let request = BackupRequest::new("shop", "x").with_tool(script_tool(
        "i=0; while [ $i -lt 20000 ]; do echo \"INSERT INTO t VALUES ($i);\"; echo warn $i >&2; i=$((i+1)); done",
    ));

    let output = with_deadline(ProcessBackend.run(first_invocation(&request))).await?;

    assert_eq!(output.stdout.iter().filter(|b| **b == b'\n').count(), 20000);
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_reports_scrubbed_stderr() -> TestResult {
    init_tracing();

    let request = BackupRequest::new("shop", "s3cr3t-pw").with_tool(script_tool(
        "echo \"mysqldump: Got error: 1045: Access denied (password: $3)\" >&2; exit 2",
    ));

    let result = with_deadline(ProcessBackend.run(first_invocation(&request))).await;

    let err = result.expect_err("tool exits non-zero");
    match &err {
        DumpError::ToolExecution {
            code,
            stderr,
            command,
        } => {
            assert_eq!(*code, Some(2));
            assert!(stderr.contains("Access denied (password: -p****)"), "{stderr}");
            assert!(command.contains("-p****"));
        }
        other => panic!("expected ToolExecution, got {other:?}"),
    }
    assert!(!err.to_string().contains("s3cr3t-pw"));
    assert!(!format!("{err:?}").contains("s3cr3t-pw"));
    Ok(())
}

#[tokio::test]
async fn short_password_keeps_stderr_readable() -> TestResult {
    init_tracing();

    let request = BackupRequest::new("shop", "x").with_tool(script_tool(
        "echo \"mysqldump: Couldn't execute 'SHOW TABLES': syntax error\" >&2; exit 2",
    ));

    let result = with_deadline(ProcessBackend.run(first_invocation(&request))).await;

    match result {
        Err(DumpError::ToolExecution { stderr, .. }) => {
            assert!(stderr.contains("Couldn't execute 'SHOW TABLES': syntax error"), "{stderr}");
        }
        other => panic!("expected ToolExecution, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() -> TestResult {
    init_tracing();

    let request = BackupRequest::new("shop", "x")
        .with_tool(DumpTool::new("/nonexistent/tabledump-no-such-mysqldump"));

    let result = ProcessBackend.run(first_invocation(&request)).await;

    match result {
        Err(DumpError::Spawn { program, source }) => {
            assert_eq!(program, "/nonexistent/tabledump-no-such-mysqldump");
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("expected Spawn error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn end_to_end_backup_orders_output_by_request() -> TestResult {
    init_tracing();

    // The bulk invocation sleeps so the filtered ones finish first.
    let script = r#"
        case " $* " in
            *" -w "*) for a in "$@"; do last=$a; done; echo "-- filtered: $last" ;;
            *) sleep 0.3; echo "-- bulk: $*" | sed 's/-px //' ;;
        esac
    "#;
    let request = BackupRequest::new("shop", "x")
        .with_tables(["customers", "orders"])
        .with_table(("products", "product_id = 4"))
        .with_table(("shippers", "name = 'Hettinger LLC'"))
        .with_tool(script_tool(script));

    let tmp = TempDir::new()?;
    let out_dir = tmp.path().join("dump");
    let path = with_deadline(
        Backup::real()
            .with_output_dir(&out_dir)
            .perform_backup(&request, "dump"),
    )
    .await?;

    assert_eq!(path, out_dir.join("dump.sql"));
    assert_eq!(
        std::fs::read_to_string(&path)?,
        "-- bulk: -u root shop customers orders\n\
         -- filtered: product_id = 4\n\
         -- filtered: name = 'Hettinger LLC'\n"
    );
    Ok(())
}

#[tokio::test]
async fn failing_invocation_leaves_no_dump_file() -> TestResult {
    init_tracing();

    let script = r#"
        case " $* " in
            *" -w "*) echo "mysqldump: Couldn't execute query" >&2; exit 2 ;;
            *) echo "-- bulk" ;;
        esac
    "#;
    let request = BackupRequest::new("shop", "x")
        .with_table("customers")
        .with_table(("orders", "id=1"))
        .with_tool(script_tool(script));

    let tmp = TempDir::new()?;
    let result = with_deadline(
        Backup::real()
            .with_output_dir(tmp.path())
            .perform_backup(&request, "dump"),
    )
    .await;

    assert!(matches!(result, Err(DumpError::ToolExecution { .. })));
    assert_eq!(std::fs::read_dir(tmp.path())?.count(), 0);
    Ok(())
}

#[tokio::test]
async fn hung_tool_times_out() -> TestResult {
    init_tracing();

    let request = BackupRequest::new("shop", "x")
        .with_tool(script_tool("sleep 30"))
        .with_timeout(Duration::from_millis(200));

    let tmp = TempDir::new()?;
    let result = with_deadline(
        Backup::real()
            .with_output_dir(tmp.path())
            .perform_backup(&request, "dump"),
    )
    .await;

    assert!(matches!(result, Err(DumpError::Timeout { .. })), "{result:?}");
    Ok(())
}
