//! Issue listing against a mocked GitLab API.

use gitlabapi::{
    get_project_issues, get_projects, CancellationToken, ErrorKind, GitlabClient,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn issue(id: u64, iid: u64, project_id: u64, state: &str) -> serde_json::Value {
    json!({
        "id": id,
        "iid": iid,
        "project_id": project_id,
        "title": format!("Issue {iid}"),
        "description": null,
        "state": state,
        "created_at": "2024-05-01T12:00:00Z",
        "web_url": format!("https://gitlab.example.com/g/p/-/issues/{iid}")
    })
}

#[tokio::test]
async fn test_issues_across_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/8/issues"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([issue(100, 3, 8, "opened"), issue(99, 2, 8, "closed")]))
                .insert_header("X-Page", "1")
                .insert_header("X-Total-Pages", "2"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/8/issues"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([issue(98, 1, 8, "opened")]))
                .insert_header("X-Page", "2")
                .insert_header("X-Total-Pages", "2"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitlabClient::new("test-token", &mock_server.uri()).unwrap();
    let issues = get_project_issues(&client, 8, &CancellationToken::new())
        .await
        .unwrap();

    let iids: Vec<u64> = issues.iter().map(|i| i.iid()).collect();
    assert_eq!(iids, vec![3, 2, 1]);
    assert!(issues.iter().all(|i| i.project_id() == 8));
    assert_eq!(issues.iter().filter(|i| i.is_open()).count(), 2);
    assert_eq!(issues[0].description(), "");
}

#[tokio::test]
async fn test_issues_of_listed_project() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 8, "name_with_namespace": "g / p"}
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/projects/8/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([issue(1, 1, 8, "opened")])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitlabClient::new("test-token", &mock_server.uri()).unwrap();
    let cancel = CancellationToken::new();
    let projects = get_projects(&client, &cancel).await.unwrap();
    let issues = projects[0].issues(&client, &cancel).await.unwrap();

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].web_url(), "https://gitlab.example.com/g/p/-/issues/1");
}

#[tokio::test]
async fn test_issue_missing_required_field_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/8/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            issue(1, 1, 8, "opened"),
            {"id": 2, "iid": 2, "project_id": 8, "title": "no state"}
        ])))
        .mount(&mock_server)
        .await;

    let client = GitlabClient::new("test-token", &mock_server.uri()).unwrap();
    let err = get_project_issues(&client, 8, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn test_issues_of_unknown_project() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/404/issues"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "404 Project Not Found"})),
        )
        .mount(&mock_server)
        .await;

    let client = GitlabClient::new("test-token", &mock_server.uri()).unwrap();
    let err = get_project_issues(&client, 404, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert!(err.to_string().contains("404 Project Not Found"));
}
