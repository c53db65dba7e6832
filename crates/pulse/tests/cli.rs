use assert_cmd::Command; // Bring Command into scope
use predicates::prelude::*; // Bring predicate traits into scope

#[test]
fn test_cancel_scenario_short_circuits() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("pulse")?;

    cmd.arg("cancel");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("stopping the duel"))
        .stdout(predicate::str::contains("duel cancelled: true"))
        .stdout(predicate::str::contains("never reached").not());

    Ok(())
}

#[test]
fn test_ordering_scenario_runs_highest_first() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("pulse")?;

    cmd.arg("ordering");

    let output = cmd.assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone())?;

    let closure_at = stdout.find("[closure] highest").expect("closure line missing");
    let high_at = stdout.find("[announcer] high").expect("high line missing");
    let low_at = stdout.find("[announcer] low").expect("low line missing");
    assert!(closure_at < high_at && high_at < low_at, "Lines out of priority order");

    Ok(())
}

#[test]
fn test_inherit_scenario_reaches_ancestor_handler() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("pulse")?;

    cmd.arg("inherit");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[fighter] inherited handler: fall in"));

    Ok(())
}
