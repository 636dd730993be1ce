// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use banjax_api::Client;
use banjax_app::MatterId;
use std::thread;
use std::time::Duration;
use time::macros::datetime;
use tiny_http::{Header, Response, Server};

fn json_response(body: &str, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

#[test]
fn connection_error_names_the_base_url() {
    let client = Client::new("http://127.0.0.1:1", Duration::from_millis(50))
        .expect("client should initialize");

    let error = client
        .team_unresolved_counts()
        .expect_err("fetch should fail for unreachable endpoint");
    let message = error.to_string();
    assert!(message.contains("http://127.0.0.1:1"));
    assert!(message.contains("api.base_url"));
}

#[test]
fn empty_base_url_is_rejected() {
    let error = Client::new("///", Duration::from_secs(1)).expect_err("empty base should fail");
    assert!(error.to_string().contains("api.base_url"));
}

#[test]
fn team_unresolved_counts_decodes_rows() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/report/team-unresolved-counts");
        request
            .respond(json_response(
                r#"[{"name":"Intake North","count":250},{"name":"Recovery West","count":12}]"#,
                200,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let teams = client.team_unresolved_counts()?;
    assert_eq!(teams.len(), 2);
    assert_eq!(teams[0].name, "Intake North");
    assert_eq!(teams[0].count, 250);
    assert_eq!(teams[1].count, 12);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn team_stage_breakdown_encodes_team_query() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(
            request.url(),
            "/report/team-stage-breakdown?team=Intake+North"
        );
        request
            .respond(json_response(
                r#"[{"stageName":"Treatment","count":30},{"stageName":"Litigation","count":90}]"#,
                200,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let stages = client.team_stage_breakdown("Intake North")?;
    assert_eq!(stages.len(), 2);
    assert_eq!(stages[0].stage_name, "Treatment");
    assert_eq!(stages[1].count, 90);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn stage_matters_decodes_dates_and_nulls() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(
            request.url(),
            "/report/stage-matters?team=Intake+North&stage=Money+Received"
        );
        let body = r#"[
            {"matterId":"a0X1","matterName":"Smith v. Acme","matterStatus":"Active",
             "clientName":"Smith","unresolvedCount":4,
             "lastMessageDate":"2026-01-09T08:30:00Z"},
            {"matterId":"a0X2","matterName":"Doe v. Roe","matterStatus":"On Hold",
             "clientName":"Doe","unresolvedCount":0,"lastMessageDate":null}
        ]"#;
        request
            .respond(json_response(body, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let matters = client.stage_matters("Intake North", "Money Received")?;
    assert_eq!(matters.len(), 2);
    assert_eq!(matters[0].matter_id, MatterId::new("a0X1"));
    assert_eq!(
        matters[0].last_message_date,
        Some(datetime!(2026-01-09 08:30 UTC)),
    );
    assert_eq!(matters[1].last_message_date, None);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn server_error_envelope_is_surfaced() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(
                r#"{"error":{"message":"unknown team Ghosts"}}"#,
                400,
            ))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .team_stage_breakdown("Ghosts")
        .expect_err("400 should surface as an error");
    assert_eq!(error.to_string(), "server error (400): unknown team Ghosts");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn malformed_body_reports_decode_context() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(r#"{"rows":[]}"#, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .team_unresolved_counts()
        .expect_err("non-array body should fail to decode");
    assert!(
        error
            .to_string()
            .contains("decode response from /report/team-unresolved-counts"),
        "unexpected message: {error:#}"
    );

    handle.join().expect("server thread should join");
    Ok(())
}
