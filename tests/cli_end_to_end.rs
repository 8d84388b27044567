#![deny(clippy::all, clippy::pedantic)]

use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use tempfile::TempDir;

/// Binary run from an empty directory with no inherited Cockpit settings.
fn ikono(workdir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ikono"));
    cmd.current_dir(workdir.path())
        .env_remove("IKONO_CONFIG_FILE")
        .env_remove("IKONO_SITE_URL")
        .env_remove("COCKPIT_BASE_URL")
        .env_remove("COCKPIT_API_TOKEN")
        .env_remove("COCKPIT_API_TOKEN_FILE")
        .env("RUST_LOG", "warn")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn artists_are_printed_sorted_by_type() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET")
            .path("/api/content/items/artist")
            .query_param("token", "cli-token")
            .query_param("locale", "ja_JP");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                r#"[{"_id":"c1","name":"Col","type":"Collection"},
                    {"_id":"r1","name":"Rep","type":"Represented"}]"#,
            );
    });

    let workdir = TempDir::new().expect("temp dir");
    let assert = ikono(&workdir)
        .args(["--cockpit-base-url", &server.base_url()])
        .args(["--cockpit-api-token", "cli-token", "--locale", "ja"])
        .arg("artists")
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    let rep = output.find("\"Rep\"").expect("represented artist listed");
    let col = output.find("\"Col\"").expect("collection artist listed");
    assert!(rep < col, "unexpected order:\n{output}");
    mock.assert();
}

#[test]
fn missing_token_fails_fast() {
    let workdir = TempDir::new().expect("temp dir");
    ikono(&workdir)
        .args(["--cockpit-base-url", "http://127.0.0.1:9"])
        .arg("artists")
        .assert()
        .failure()
        .stderr(contains("cockpit.api_token"));
}

#[test]
fn missing_artist_exits_with_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/content/item/artist/ghost");
        then.status(404);
    });

    let workdir = TempDir::new().expect("temp dir");
    ikono(&workdir)
        .args(["--cockpit-base-url", &server.base_url()])
        .args(["--cockpit-api-token", "cli-token"])
        .args(["artist", "ghost"])
        .assert()
        .failure()
        .stderr(contains("artist `ghost` not found"));
}

#[test]
fn image_falls_back_to_original_asset() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("GET").path("/api/assets/image/img1");
        then.status(500);
    });

    let workdir = TempDir::new().expect("temp dir");
    let expected = format!("{}/api/assets/image/img1", server.base_url());
    ikono(&workdir)
        .args(["--cockpit-base-url", &server.base_url()])
        .args(["--cockpit-api-token", "cli-token"])
        .args(["image", "img1", "--width", "400"])
        .assert()
        .success()
        .stdout(contains(expected));
    mock.assert();
}

#[test]
fn enquiry_posts_without_cms_credentials() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("name=Ren&artwork=kumo&form-name=artwork-enquiry");
        then.status(200);
    });

    let workdir = TempDir::new().expect("temp dir");
    ikono(&workdir)
        .args(["enquire", "--site", &server.base_url()])
        .args(["--field", "name=Ren", "--field", "artwork=kumo"])
        .assert()
        .success()
        .stdout(contains("enquiry sent to"));
    mock.assert();
}
