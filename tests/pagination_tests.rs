//! Integration tests for paginated list operations.
//!
//! Covers `Link` header pagination on the REST API, `links.next` body
//! pagination on the Infrastructure API, and the page limit and cycle
//! guards.

use newrelic_client::clients::{HttpClient, HttpResponse, LinkHeaderPager};
use newrelic_client::resources::{Alerts, Infrastructure};
use newrelic_client::{ApiKey, Config, HttpError, RetryPolicy};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn config_for(server: &MockServer) -> newrelic_client::ConfigBuilder {
    Config::builder()
        .api_key(ApiKey::new("abc123").unwrap())
        .base_url(server.uri())
        .infrastructure_base_url(server.uri())
        .retry(RetryPolicy::none())
}

fn page_number(request: &Request) -> u32 {
    request
        .url
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(1)
}

fn policy(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "incident_preference": "PER_POLICY",
        "name": format!("policy-{id}"),
        "created_at": 1575438237690_i64,
        "updated_at": 1575438237690_i64
    })
}

/// Serves `last_page` pages of one policy each, linked with `Link` headers.
fn paged_policies(
    base: String,
    last_page: u32,
) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync {
    move |request: &Request| {
        let page = page_number(request);
        let mut template =
            ResponseTemplate::new(200).set_body_json(json!({"policies": [policy(u64::from(page))]}));
        if page < last_page {
            template = template.insert_header(
                "Link",
                format!(
                    "<{base}/alerts_policies.json?page={}>; rel=\"next\", <{base}/alerts_policies.json?page={last_page}>; rel=\"last\"",
                    page + 1
                )
                .as_str(),
            );
        }
        template
    }
}

#[tokio::test]
async fn test_link_header_pagination_fetches_every_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alerts_policies.json"))
        .respond_with(paged_policies(server.uri(), 3))
        .expect(3)
        .mount(&server)
        .await;

    let alerts = Alerts::new(&config_for(&server).build().unwrap()).unwrap();
    let policies = alerts.list_policies(None).await.unwrap();

    let ids: Vec<_> = policies.iter().filter_map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_single_page_without_link_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alerts_policies.json"))
        .and(query_param("filter[name]", "policy-1"))
        .respond_with(paged_policies(server.uri(), 1))
        .expect(1)
        .mount(&server)
        .await;

    let alerts = Alerts::new(&config_for(&server).build().unwrap()).unwrap();
    let policies = alerts.list_policies(Some("policy-1")).await.unwrap();

    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0].name, "policy-1");
}

#[tokio::test]
async fn test_page_limit_stops_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alerts_policies.json"))
        .respond_with(paged_policies(server.uri(), 10))
        .expect(2)
        .mount(&server)
        .await;

    let config = config_for(&server).max_pages(2).build().unwrap();
    let alerts = Alerts::new(&config).unwrap();
    let err = alerts.list_policies(None).await.unwrap_err();

    assert!(matches!(err, HttpError::PaginationLimitExceeded { max_pages: 2 }));
}

#[tokio::test]
async fn test_repeated_next_link_is_a_cycle() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/alerts_policies.json"))
        .respond_with(move |_: &Request| {
            ResponseTemplate::new(200)
                .set_body_json(json!({"policies": []}))
                .insert_header(
                    "Link",
                    format!("<{base}/alerts_policies.json?page=2>; rel=\"next\"").as_str(),
                )
        })
        .expect(2)
        .mount(&server)
        .await;

    let alerts = Alerts::new(&config_for(&server).build().unwrap()).unwrap();
    let err = alerts.list_policies(None).await.unwrap_err();

    assert!(matches!(err, HttpError::PaginationCycle { ref cursor } if cursor.ends_with("page=2")));
}

#[tokio::test]
async fn test_absolute_link_back_to_first_page_is_a_cycle() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/alerts_policies.json"))
        .respond_with(move |_: &Request| {
            ResponseTemplate::new(200)
                .set_body_json(json!({"policies": [policy(1)]}))
                .insert_header(
                    "Link",
                    format!("<{base}/alerts_policies.json>; rel=\"next\"").as_str(),
                )
        })
        .expect(1)
        .mount(&server)
        .await;

    let alerts = Alerts::new(&config_for(&server).build().unwrap()).unwrap();
    let err = alerts.list_policies(None).await.unwrap_err();

    assert!(matches!(
        err,
        HttpError::PaginationCycle { ref cursor } if cursor.ends_with("/alerts_policies.json")
    ));
}

#[tokio::test]
async fn test_error_on_later_page_discards_results() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/alerts_policies.json"))
        .respond_with(move |request: &Request| {
            if page_number(request) == 1 {
                ResponseTemplate::new(200)
                    .set_body_json(json!({"policies": [policy(1)]}))
                    .insert_header(
                        "Link",
                        format!("<{base}/alerts_policies.json?page=2>; rel=\"next\"").as_str(),
                    )
            } else {
                ResponseTemplate::new(500)
                    .set_body_json(json!({"error": {"title": "page unavailable"}}))
            }
        })
        .expect(2)
        .mount(&server)
        .await;

    let alerts = Alerts::new(&config_for(&server).build().unwrap()).unwrap();
    let err = alerts.list_policies(None).await.unwrap_err();

    assert_eq!(err.to_string(), "500 response returned: page unavailable");
}

#[tokio::test]
async fn test_list_all_with_custom_extractor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alerts_policies.json"))
        .respond_with(paged_policies(server.uri(), 2))
        .expect(2)
        .mount(&server)
        .await;

    let client = HttpClient::new(&config_for(&server).build().unwrap()).unwrap();
    let names: Vec<String> = client
        .list_all(
            "/alerts_policies.json",
            &(),
            &LinkHeaderPager,
            |response: &HttpResponse| {
                let body: serde_json::Value = response.json()?;
                Ok(body["policies"]
                    .as_array()
                    .into_iter()
                    .flatten()
                    .filter_map(|p| p["name"].as_str().map(ToString::to_string))
                    .collect())
            },
        )
        .await
        .unwrap();

    assert_eq!(names, vec!["policy-1", "policy-2"]);
}

#[tokio::test]
async fn test_json_body_pagination_follows_links_next() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/alerts/conditions"))
        .and(query_param("policy_id", "111111"))
        .respond_with(move |request: &Request| {
            let second = request.url.query_pairs().any(|(key, _)| key == "offset");
            let condition = |id: u64| {
                json!({
                    "id": id,
                    "policy_id": 111111,
                    "name": format!("condition-{id}"),
                    "type": "infra_process_running",
                    "enabled": true
                })
            };
            if second {
                ResponseTemplate::new(200).set_body_json(json!({
                    "data": [condition(2)],
                    "links": {"next": null}
                }))
            } else {
                ResponseTemplate::new(200).set_body_json(json!({
                    "data": [condition(1)],
                    "links": {"next": format!("{base}/alerts/conditions?policy_id=111111&offset=1")}
                }))
            }
        })
        .expect(2)
        .mount(&server)
        .await;

    let infra = Infrastructure::new(&config_for(&server).build().unwrap()).unwrap();
    let conditions = infra.list_conditions(111111).await.unwrap();

    let names: Vec<_> = conditions.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["condition-1", "condition-2"]);
}
