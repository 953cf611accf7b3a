use std::path::Path;
use std::process::Command;

fn copy_fixture(name: &str, dir: &Path) -> std::path::PathBuf {
    let target = dir.join(name);
    std::fs::copy(format!("tests/fixtures/{name}"), &target)
        .unwrap_or_else(|e| panic!("failed to copy fixture {name}: {e}"));
    target
}

#[test]
fn writes_next_to_the_input_by_default() {
    let temp = tempfile::tempdir().expect("should create temp dir");
    let input = copy_fixture("colors.tsv", temp.path());

    let output = Command::new(env!("CARGO_BIN_EXE_tsv2sql"))
        .arg(&input)
        .output()
        .expect("should run tsv2sql binary");

    assert!(output.status.success(), "tsv2sql failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "Column names imported\nWriting\n");

    let sql = std::fs::read_to_string(temp.path().join("colors.sql"))
        .expect("default output should exist");
    assert!(sql.starts_with("DROP TABLE IF EXISTS colors;\n"));
    assert!(sql.ends_with("(12,'yellow',34),\n(56,'red',78);"));
}

#[test]
fn honours_output_table_and_primary_key_flags() {
    let temp = tempfile::tempdir().expect("should create temp dir");
    let input = copy_fixture("colors.tsv", temp.path());
    let sql_path = temp.path().join("custom.sql");

    let status = Command::new(env!("CARGO_BIN_EXE_tsv2sql"))
        .arg(&input)
        .arg("-o")
        .arg(&sql_path)
        .args(["-t", "palette", "-p", "--verify"])
        .status()
        .expect("should run tsv2sql binary");

    assert!(status.success());
    let sql = std::fs::read_to_string(&sql_path).expect("custom output should exist");
    assert!(sql.contains("CREATE TABLE palette(\n`one` INT NOT NULL,\n"));
    assert!(sql.contains("PRIMARY KEY ( `one` ));"));
    assert!(sql.contains("INSERT INTO palette\n"));
    assert!(!temp.path().join("colors.sql").exists());
}

#[test]
fn missing_input_fails_without_output() {
    let temp = tempfile::tempdir().expect("should create temp dir");
    let input = temp.path().join("absent.tsv");

    let output = Command::new(env!("CARGO_BIN_EXE_tsv2sql"))
        .arg(&input)
        .output()
        .expect("should run tsv2sql binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("absent.tsv"), "stderr was: {stderr}");
    assert!(!temp.path().join("absent.sql").exists());
}

#[test]
fn ragged_input_reports_the_line() {
    let temp = tempfile::tempdir().expect("should create temp dir");
    let input = temp.path().join("ragged.tsv");
    std::fs::write(&input, "a\tb\n1\t2\n3\n").expect("should write input");

    let output = Command::new(env!("CARGO_BIN_EXE_tsv2sql"))
        .arg(&input)
        .output()
        .expect("should run tsv2sql binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("line 3: expected 2 fields, found 1"),
        "stderr was: {stderr}"
    );
}

#[test]
fn format_escape_and_snake_case_flags_shape_the_script() {
    let temp = tempfile::tempdir().expect("should create temp dir");
    let input = temp.path().join("Exam Marks.txt");
    std::fs::write(&input, "Student Name,Final Score\nO'Brien,3.5\nAda,4\n")
        .expect("should write input");

    let status = Command::new(env!("CARGO_BIN_EXE_tsv2sql"))
        .arg(&input)
        .args(["--format", "csv", "-e", "--snake-case", "--verify"])
        .status()
        .expect("should run tsv2sql binary");

    assert!(status.success());
    let sql = std::fs::read_to_string(temp.path().join("Exam Marks.sql"))
        .expect("default output should exist");
    assert!(sql.starts_with("DROP TABLE IF EXISTS exam_marks;\n"));
    assert!(sql.contains("`student_name` VARCHAR(20),\n`final_score` FLOAT,\n"));
    assert!(sql.contains("(`student_name`,`final_score`)"));
    assert!(sql.ends_with("('O''Brien',3.5),\n('Ada',4);"));
}

#[test]
fn long_escape_flag_and_tsv_format_override_the_extension() {
    let temp = tempfile::tempdir().expect("should create temp dir");
    let input = temp.path().join("notes.csv");
    std::fs::write(&input, "title\tpages\nit's, fine\t12\n").expect("should write input");

    let status = Command::new(env!("CARGO_BIN_EXE_tsv2sql"))
        .arg(&input)
        .args(["--format", "tsv", "--escape"])
        .status()
        .expect("should run tsv2sql binary");

    assert!(status.success());
    let sql = std::fs::read_to_string(temp.path().join("notes.sql"))
        .expect("default output should exist");
    assert!(sql.contains("(`title`,`pages`)"));
    assert!(sql.ends_with("('it''s, fine',12);"));
}
