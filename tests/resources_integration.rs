//
//  bitbucket-client
//  tests/resources_integration.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Integration tests for the resource façades against a mock server.

mod common;

use std::io::Write;

use bitbucket_client::api::cloud::{
    BranchRestrictionsOptions, CommitStatusOptions, CommitsOptions, DiffOptions,
    ProjectRepositoryOptions, PullRequestsOptions, RepositoryOptions, RepositoryPipelineOptions,
    UploadContent, WebhooksOptions,
};
use bitbucket_client::ApiError;
use mockito::Matcher;
use serde_json::json;

const ERROR_ENVELOPE: &str =
    r#"{"type": "error", "error": {"message": "Repository not found", "detail": "acme/nope"}}"#;

#[tokio::test]
async fn test_team_projects_names() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/teams/acme/repositories")
        .with_status(200)
        .with_body(r#"{"values": [{"name": "P1"}, {"name": "P2"}], "size": 2}"#)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let names = client.teams().projects("acme").await.unwrap();

    assert_eq!(names, vec!["P1", "P2"]);
}

#[tokio::test]
async fn test_team_projects_bad_shape() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/teams/acme/repositories")
        .with_status(200)
        .with_body(r#"{"values": {"name": "P1"}}"#)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let err = client.teams().projects("acme").await.unwrap_err();

    assert!(matches!(err, ApiError::Shape(_)));
}

#[tokio::test]
async fn test_error_envelope_becomes_service_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repositories/acme/nope")
        .with_status(404)
        .with_body(ERROR_ENVELOPE)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let err = client
        .repository()
        .get(&RepositoryOptions::new("acme", "nope"))
        .await
        .unwrap_err();

    match err {
        ApiError::Service { message, detail, .. } => {
            assert_eq!(message, "Repository not found");
            assert_eq!(detail.as_deref(), Some("acme/nope"));
        }
        other => panic!("expected a service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_envelope_on_pass_through_listing() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repositories/acme/nope/forks")
        .with_status(404)
        .with_body(ERROR_ENVELOPE)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let err = client
        .repository()
        .list_forks(&RepositoryOptions::new("acme", "nope"))
        .await
        .unwrap_err();

    assert!(err.is_service_error());
}

#[tokio::test]
async fn test_create_repository_sends_set_fields() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/repositories/acme/api")
        .match_header("authorization", common::basic_header().as_str())
        .match_body(Matcher::Json(json!({
            "scm": "git",
            "is_private": true,
            "project": {"key": "BACK"}
        })))
        .with_status(200)
        .with_body(
            json!({
                "type": "repository",
                "slug": "api",
                "full_name": "acme/api",
                "is_private": true,
                "project": {"key": "BACK", "name": "Backend"}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let opts = RepositoryOptions {
        scm: Some("git".to_string()),
        is_private: Some(true),
        project: Some("BACK".to_string()),
        ..RepositoryOptions::new("acme", "api")
    };
    let repo = client.repository().create(&opts).await.unwrap();

    assert_eq!(repo.full_name, "acme/api");
    assert_eq!(repo.project.unwrap().name, "Backend");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_add_default_reviewer() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PUT", "/repositories/acme/api/default-reviewers/alice")
        .with_status(200)
        .with_body(r#"{"type": "user", "username": "alice"}"#)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    client
        .repository()
        .add_default_reviewer(&RepositoryOptions::new("acme", "api"), "alice")
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_file_defaults_to_master() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repositories/acme/api/src/master/README.md")
        .with_status(200)
        .with_body("# api\n")
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let content = client
        .repository()
        .get_file(&RepositoryOptions::new("acme", "api"), "", "/README.md")
        .await
        .unwrap();

    assert_eq!(content, b"# api\n");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_file_text_form() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/repositories/acme/api/src")
        .match_header("authorization", common::basic_header().as_str())
        .match_header(
            "content-type",
            Matcher::Regex("application/x-www-form-urlencoded".to_string()),
        )
        .match_body(Matcher::UrlEncoded(
            "src/main/test.txt".to_string(),
            "hello world".to_string(),
        ))
        .with_status(201)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let response = client
        .repository()
        .upload_file(
            &RepositoryOptions::new("acme", "api"),
            "src/main/test.txt",
            UploadContent::Text("hello world".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_file_multipart() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "uploaded contents").unwrap();

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/repositories/acme/api/src")
        .match_header("content-type", Matcher::Regex("multipart/form-data".to_string()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"form-data; name="docs/notes.txt"; filename="#.to_string()),
            Matcher::Regex("uploaded contents".to_string()),
        ]))
        .with_status(201)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    client
        .repository()
        .upload_file(
            &RepositoryOptions::new("acme", "api"),
            "docs/notes.txt",
            UploadContent::File(file.path().to_path_buf()),
        )
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_missing_file_is_io_error() {
    let server = mockito::Server::new_async().await;
    let client = common::basic_client(&server.url());

    let err = client
        .repository()
        .upload_file(
            &RepositoryOptions::new("acme", "api"),
            "x.txt",
            UploadContent::File("/definitely/not/here.txt".into()),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Io(_)));
}

#[tokio::test]
async fn test_list_for_project_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repositories/acme")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".to_string(), r#"project.key="BACK""#.to_string()),
            Matcher::UrlEncoded("page".to_string(), "2".to_string()),
            Matcher::UrlEncoded("pagelen".to_string(), "20".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"values": [], "page": 2}"#)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let opts = ProjectRepositoryOptions::new("acme", "BACK")
        .page(2)
        .page_length(20);
    client.repositories().list_for_project(&opts).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_update_pipeline_config() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PUT", "/repositories/acme/api/pipelines_config")
        .match_body(Matcher::Json(json!({"enabled": true})))
        .with_status(200)
        .with_body(r#"{"type": "repository_pipelines_configuration", "enabled": true}"#)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let pipeline = client
        .repository()
        .update_pipeline_config(&RepositoryPipelineOptions::new("acme", "api", true))
        .await
        .unwrap();

    assert!(pipeline.enabled);
}

#[tokio::test]
async fn test_pull_requests_list_states() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repositories/acme/api/pullrequests/")
        .match_query(Matcher::Exact("state=OPEN&state=MERGED".to_string()))
        .with_status(200)
        .with_body(r#"{"values": [{"id": 1}]}"#)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let opts = PullRequestsOptions {
        states: vec!["OPEN".to_string(), "MERGED".to_string()],
        ..PullRequestsOptions::new("acme", "api")
    };
    let page = client.pull_requests().list(&opts).await.unwrap();

    assert_eq!(page["values"][0]["id"], 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_pull_request_diff_text() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repositories/acme/api/pullrequests/3/diff")
        .with_status(200)
        .with_body("diff --git a/x b/x\n")
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let diff = client
        .pull_requests()
        .diff(&PullRequestsOptions::new("acme", "api").id(3))
        .await
        .unwrap();

    assert!(diff.starts_with("diff --git"));
}

#[tokio::test]
async fn test_commit_status_create() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/repositories/acme/api/commit/abc123/statuses/build")
        .match_body(Matcher::Json(json!({
            "key": "ci",
            "state": "INPROGRESS",
            "url": "https://ci.example.com/7"
        })))
        .with_status(201)
        .with_body(r#"{"key": "ci", "state": "INPROGRESS"}"#)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let status = CommitStatusOptions {
        key: "ci".to_string(),
        state: "INPROGRESS".to_string(),
        url: "https://ci.example.com/7".to_string(),
        ..Default::default()
    };
    client
        .commits()
        .create_status(&CommitsOptions::new("acme", "api").revision("abc123"), &status)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_diff_range() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repositories/acme/api/patch/a1..b2")
        .with_status(200)
        .with_body("From a1\n")
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let patch = client
        .diff()
        .patch(&DiffOptions::new("acme", "api", "a1..b2"))
        .await
        .unwrap();

    assert_eq!(patch, "From a1\n");
}

#[tokio::test]
async fn test_webhook_create() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/repositories/acme/api/hooks/")
        .match_body(Matcher::Json(json!({
            "url": "https://ci.example.com/hook",
            "active": true,
            "events": ["repo:push"]
        })))
        .with_status(201)
        .with_body(
            json!({
                "uuid": "{h1}",
                "url": "https://ci.example.com/hook",
                "subject_type": "repository",
                "active": true,
                "events": ["repo:push"]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let opts = WebhooksOptions {
        url: Some("https://ci.example.com/hook".to_string()),
        events: vec!["repo:push".to_string()],
        ..WebhooksOptions::new("acme", "api")
    };
    let hook = client.webhooks().create(&opts).await.unwrap();

    assert_eq!(hook.uuid, "{h1}");
    assert!(hook.active);
}

#[tokio::test]
async fn test_remove_default_reviewer() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/repositories/acme/api/default-reviewers/alice")
        .match_header("authorization", common::basic_header().as_str())
        .with_status(204)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    client
        .repository()
        .remove_default_reviewer(&RepositoryOptions::new("acme", "api"), "alice")
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_get_file_error_envelope() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repositories/acme/api/src/develop/missing.txt")
        .with_status(404)
        .with_body(
            r#"{"type": "error", "error": {"message": "No such file or directory: missing.txt"}}"#,
        )
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let err = client
        .repository()
        .get_file(&RepositoryOptions::new("acme", "api"), "develop", "missing.txt")
        .await
        .unwrap_err();

    match err {
        ApiError::Service { message, .. } => {
            assert_eq!(message, "No such file or directory: missing.txt")
        }
        other => panic!("expected a service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_file_json_content_passes_through() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repositories/acme/api/src/master/package.json")
        .with_status(200)
        .with_body(r#"{"name": "api", "type": "module"}"#)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let content = client
        .repository()
        .get_file(&RepositoryOptions::new("acme", "api"), "", "package.json")
        .await
        .unwrap();

    assert_eq!(content, br#"{"name": "api", "type": "module"}"#);
}

#[tokio::test]
async fn test_diff_error_envelope() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repositories/acme/api/diff/deadbeef")
        .with_status(404)
        .with_body(r#"{"type": "error", "error": {"message": "Commit not found"}}"#)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let err = client
        .diff()
        .diff(&DiffOptions::new("acme", "api", "deadbeef"))
        .await
        .unwrap_err();

    assert!(err.is_service_error());
    assert_eq!(err.to_string(), "Bitbucket error: Commit not found");
}

#[tokio::test]
async fn test_pull_request_patch_error_envelope() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/repositories/acme/api/pullrequests/99/patch")
        .with_status(404)
        .with_body(r#"{"type": "error", "error": {"message": "Pull request not found"}}"#)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let err = client
        .pull_requests()
        .patch(&PullRequestsOptions::new("acme", "api").id(99))
        .await
        .unwrap_err();

    assert!(err.is_service_error());
}

#[tokio::test]
async fn test_branch_restriction_get_update_delete() {
    let mut server = mockito::Server::new_async().await;
    let rule = json!({
        "type": "branchrestriction",
        "id": 12,
        "kind": "push",
        "branch_match_kind": "glob",
        "pattern": "main",
        "users": [],
        "groups": []
    })
    .to_string();
    let get = server
        .mock("GET", "/repositories/acme/api/branch-restrictions/12")
        .with_status(200)
        .with_body(&rule)
        .create_async()
        .await;
    let update = server
        .mock("PUT", "/repositories/acme/api/branch-restrictions/12")
        .match_body(Matcher::Json(json!({
            "kind": "push",
            "pattern": "main",
            "users": [{"username": "jdoe"}],
            "groups": []
        })))
        .with_status(200)
        .with_body(&rule)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/repositories/acme/api/branch-restrictions/12")
        .with_status(204)
        .create_async()
        .await;

    let client = common::basic_client(&server.url());
    let restrictions = client.branch_restrictions();
    let opts = BranchRestrictionsOptions {
        kind: "push".to_string(),
        pattern: Some("main".to_string()),
        users: vec!["jdoe".to_string()],
        ..BranchRestrictionsOptions::new("acme", "api").id(12)
    };

    let fetched = restrictions.get(&opts).await.unwrap();
    assert_eq!(fetched.id, 12);
    let updated = restrictions.update(&opts).await.unwrap();
    assert_eq!(updated.pattern, "main");
    assert!(restrictions.delete(&opts).await.unwrap().is_null());

    get.assert_async().await;
    update.assert_async().await;
    delete.assert_async().await;
}
