use std::process::{Command, Output};

fn waypoint_defence(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_waypoint-defence"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch the waypoint-defence binary")
}

/// Numbers of the summary line starting with `prefix`, in order.
fn summary_numbers(stdout: &str, prefix: &str) -> Vec<u64> {
    let line = stdout
        .lines()
        .find(|line| line.starts_with(prefix))
        .unwrap_or_else(|| panic!("summary line `{prefix}` missing from:\n{stdout}"));
    line.split(|character: char| !character.is_ascii_digit())
        .filter(|token| !token.is_empty())
        .map(|token| token.parse().expect("digits parse"))
        .collect()
}

const SEEDED_CAMPAIGN: [&str; 12] = [
    "--map",
    "hard",
    "--tower",
    "basic@96,32",
    "--autopilot",
    "6",
    "--seed",
    "7",
    "--ticks",
    "4000",
    "--report-every",
    "0",
];

#[test]
fn seeded_autopilot_campaign_is_tallied() {
    let output = waypoint_defence(&SEEDED_CAMPAIGN);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).expect("utf-8 stdout");

    assert!(stdout.lines().any(|line| line == "== Waypoint Defence =="));
    let verdict = stdout
        .lines()
        .find(|line| line.contains(" ticks: wave "))
        .expect("verdict line");
    assert!(
        ["campaign complete", "game over", "out of ticks"]
            .iter()
            .any(|prefix| verdict.starts_with(prefix)),
        "unexpected verdict `{verdict}`"
    );

    let shop = summary_numbers(&stdout, "towers bought");
    let (bought, shots, refused) = (shop[0], shop[1], shop[3]);
    assert_eq!(bought + refused, 7, "every order is bought or refused");
    assert!(bought >= 6, "the autopilot alone fits the starting budget");
    assert!(shots > 0, "a tower beside the entrance must fire");

    let critters = summary_numbers(&stdout, "critters spawned");
    let (spawned, killed, escaped) = (critters[0], critters[1], critters[3]);
    assert!(spawned > 0);
    assert!(killed + escaped <= spawned);

    let towers = stdout.lines().filter(|line| line.starts_with("  ")).count() as u64;
    assert_eq!(towers, bought);
}

#[test]
fn seeded_campaigns_are_reproducible() {
    let first = waypoint_defence(&SEEDED_CAMPAIGN);
    let second = waypoint_defence(&SEEDED_CAMPAIGN);

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn unknown_tower_kinds_are_refused_before_playing() {
    let output = waypoint_defence(&["--tower", "laser@1,2"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown tower kind"), "{stderr}");
}

#[test]
fn unreadable_config_files_are_reported() {
    let output = waypoint_defence(&["--config", "does/not/exist.toml"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read config file"), "{stderr}");
}
