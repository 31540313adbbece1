// CLI regression tests: drive the stdinext binary end to end.
// Every run ends with #EXIT so the interactive phase never waits on a terminal.

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn stdinext() -> Command {
    Command::cargo_bin("stdinext").unwrap()
}

#[test]
fn cli_help_lists_builtins_and_exits() {
    stdinext()
        .arg("--help")
        .assert()
        .success()
        .stdout("")
        .stderr(contains("Builtin macro: (Not overwritable, nor removable)").and(contains("#EXIT")));
}

#[test]
fn cli_short_help() {
    stdinext().arg("-h").assert().success().stderr(contains("#EVAL"));
}

#[test]
fn cli_double_dash_is_passed_through() {
    stdinext()
        .args(["--", "#EXIT"])
        .assert()
        .success()
        .stdout("--\n");
}

#[test]
fn cli_hyphenated_lines_after_the_first_are_passed_through() {
    stdinext()
        .args(["-x", "--help", "-h", "#EXIT"])
        .assert()
        .success()
        .stdout("-x\n--help\n-h\n");
}

#[test]
fn cli_printf_directives_render() {
    stdinext()
        .args(["#N=%d items", "#N 5", "#EXIT"])
        .assert()
        .success()
        .stdout("5 items\n");
}

#[test]
fn cli_argv_definition_persists_into_stdin() {
    stdinext()
        .arg("#GREET=Hello %1%!")
        .write_stdin("#GREET world\n#EXIT\n")
        .assert()
        .success()
        .stdout("Hello world!\n");
}

#[test]
fn cli_passthrough_and_noops() {
    stdinext()
        .write_stdin("#!/usr/bin/env stdinext\n##comment\n#\nplain text\n\n#EXIT\n")
        .assert()
        .success()
        .stdout("plain text\n");
}

#[test]
fn cli_exit_stops_everything() {
    stdinext()
        .args(["before", "#EXIT", "after"])
        .write_stdin("never\n")
        .assert()
        .success()
        .stdout("before\n");
}

#[test]
fn cli_eof_advances_to_next_source() {
    stdinext()
        .args(["a", "#EOF", "b"])
        .write_stdin("c\n#EXIT\nd\n")
        .assert()
        .success()
        .stdout("a\nc\n");
}

#[test]
fn cli_output_mode_switches_streams() {
    stdinext()
        .args(["#CERR", "to stderr", "#COUT", "to stdout", "#EXIT"])
        .assert()
        .success()
        .stdout("to stdout\n")
        .stderr(contains("to stderr"));
}

#[test]
fn cli_warnings_go_to_stderr() {
    stdinext()
        .args(["#EXIT=noop", "#NOPE", "#DEL EXIT", "#EXIT"])
        .assert()
        .success()
        .stdout("")
        .stderr(
            contains("Builtin macro cannot be overwritten: EXIT")
                .and(contains("The macro NOPE is not defined"))
                .and(contains("Builtin macro cannot be removed: EXIT")),
        );
}

#[test]
fn cli_eval_runs_shell_command() {
    stdinext()
        .args(["#EVAL echo '#N=%1% and %2%'; echo '#N cats dogs'", "#EXIT"])
        .assert()
        .success()
        .stdout("cats and dogs\n");
}

#[test]
fn cli_malformed_template_is_fatal() {
    stdinext()
        .args(["#BAD=100%", "#BAD", "#EXIT"])
        .assert()
        .failure()
        .stderr(contains("malformed template for macro BAD"));
}
