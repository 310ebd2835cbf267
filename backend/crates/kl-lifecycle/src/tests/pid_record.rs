use crate::{LifecycleError, PidRecord, PidRecordParseError};

use googletest::assert_that;
use googletest::prelude::{eq, err, none, ok, some};
use tempfile::TempDir;

// =========================================================================
// Parsing
// =========================================================================

#[test]
fn given_pid_and_port_when_parse_then_both_read() {
    assert_that!(
        "1234\n8080".parse::<PidRecord>(),
        ok(eq(&PidRecord::new(1234, Some(8080))))
    );
}

#[test]
fn given_pid_only_when_parse_then_port_unknown() {
    assert_that!(
        "1234\n".parse::<PidRecord>(),
        ok(eq(&PidRecord::new(1234, None)))
    );
}

#[test]
fn given_surrounding_whitespace_when_parse_then_trimmed() {
    assert_that!(
        "  1234 \r\n 8080 \n\n".parse::<PidRecord>(),
        ok(eq(&PidRecord::new(1234, Some(8080))))
    );
}

#[test]
fn given_unparsable_port_when_parse_then_port_unknown() {
    assert_that!(
        "1234\nnot-a-port".parse::<PidRecord>(),
        ok(eq(&PidRecord::new(1234, None)))
    );
    assert_that!(
        "1234\n70000".parse::<PidRecord>(),
        ok(eq(&PidRecord::new(1234, None)))
    );
}

#[test]
fn given_empty_content_when_parse_then_empty_error() {
    assert_that!("".parse::<PidRecord>(), err(eq(&PidRecordParseError::Empty)));
    assert_that!(
        " \n \n".parse::<PidRecord>(),
        err(eq(&PidRecordParseError::Empty))
    );
}

#[test]
fn given_zero_or_negative_pid_when_parse_then_invalid() {
    assert_that!(
        "0\n8080".parse::<PidRecord>(),
        err(eq(&PidRecordParseError::InvalidPid("0".into())))
    );
    assert_that!(
        "-5".parse::<PidRecord>(),
        err(eq(&PidRecordParseError::InvalidPid("-5".into())))
    );
}

#[test]
fn given_three_lines_when_parse_then_too_many_lines() {
    assert_that!(
        "1234\n8080\nextra".parse::<PidRecord>(),
        err(eq(&PidRecordParseError::TooManyLines(3)))
    );
}

#[test]
fn given_record_when_display_then_pid_and_port_lines() {
    assert_that!(
        PidRecord::new(1234, Some(8080)).to_string(),
        eq("1234\n8080")
    );
    assert_that!(PidRecord::new(1234, None).to_string(), eq("1234\n"));
}

// =========================================================================
// Files
// =========================================================================

#[test]
fn given_missing_file_when_read_then_none() {
    let home = TempDir::new().unwrap();

    assert_that!(
        PidRecord::read(&home.path().join("server.pid")).unwrap(),
        none()
    );
}

#[test]
fn given_written_record_when_read_then_same_record() {
    // Given
    let home = TempDir::new().unwrap();
    let path = home.path().join("server.pid");
    PidRecord::new(1234, Some(8080)).write(&path).unwrap();

    // When
    let record = PidRecord::read(&path).unwrap();

    // Then
    assert_that!(record, some(eq(PidRecord::new(1234, Some(8080)))));
}

#[test]
fn given_malformed_file_when_read_then_pid_file_invalid() {
    // Given
    let home = TempDir::new().unwrap();
    let path = home.path().join("server.pid");
    std::fs::write(&path, "abc").unwrap();

    // When
    let result = PidRecord::read(&path);

    // Then
    assert!(matches!(
        result,
        Err(LifecycleError::PidFileInvalid {
            source: PidRecordParseError::InvalidPid(_),
            ..
        })
    ));
}

#[test]
fn given_existing_file_when_remove_then_true_and_second_remove_false() {
    // Given
    let home = TempDir::new().unwrap();
    let path = home.path().join("server.pid");
    PidRecord::new(1234, Some(8080)).write(&path).unwrap();

    // When / Then
    assert!(PidRecord::remove(&path).unwrap());
    assert!(!PidRecord::remove(&path).unwrap());
    assert!(!path.exists());
}
