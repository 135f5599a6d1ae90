//! Service discovery tests.

mod common;

use std::sync::Arc;

use common::{SERVICE, ScriptedTransport};
use halo_core::{Catalog, Error, QueryOptions, Transport};
use serde_json::json;

fn discover(transport: &Arc<ScriptedTransport>) -> halo_core::Result<Catalog> {
    let transport: Arc<dyn Transport> = transport.clone();
    Catalog::discover(SERVICE, transport)
}

#[test]
fn discovers_child_resources() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({
        "_links": {
            "child": [
                {"title": "users", "href": "users"},
                {"title": "cities", "href": "cities"}
            ]
        }
    }));

    let catalog = discover(&transport).unwrap();

    assert_eq!(catalog.names().collect::<Vec<_>>(), ["users", "cities"]);
    assert_eq!(catalog.len(), 2);
    let users = catalog.resource("users").unwrap();
    assert_eq!(users.name(), "users");
    assert_eq!(users.url(), format!("{SERVICE}/users"));
    assert_eq!(catalog.url().as_str(), SERVICE);

    let request = transport.last_request();
    assert_eq!(request.url, SERVICE);
}

#[test]
fn resolves_host_qualified_child_links() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({
        "_links": {"child": [{"title": "users", "href": "localhost:5000/v1/users"}]}
    }));

    let catalog = discover(&transport).unwrap();
    assert_eq!(
        catalog.resource("users").unwrap().url(),
        "http://localhost:5000/v1/users"
    );
}

#[test]
fn missing_links_is_not_readable() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({"_items": []}));

    match discover(&transport) {
        Err(Error::ContentNotReadable { reason }) => assert!(reason.contains("_links")),
        other => panic!("expected ContentNotReadable, got {other:?}"),
    }
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn missing_child_list_is_not_readable() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({"_links": {"self": {"href": "/v1"}}}));

    match discover(&transport) {
        Err(Error::ContentNotReadable { reason }) => assert!(reason.contains("child")),
        other => panic!("expected ContentNotReadable, got {other:?}"),
    }
}

#[test]
fn malformed_child_link_is_not_readable() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({"_links": {"child": [{"href": "users"}]}}));

    assert!(matches!(
        discover(&transport),
        Err(Error::ContentNotReadable { .. })
    ));
}

#[test]
fn unknown_resource_is_a_distinct_error() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({"_links": {"child": [{"title": "users", "href": "users"}]}}));

    let catalog = discover(&transport).unwrap();

    match catalog.resource("Users") {
        Err(Error::UnknownResource { name }) => assert_eq!(name, "Users"),
        other => panic!("expected UnknownResource, got {other:?}"),
    }
    assert!(catalog.get("cities").is_none());
}

#[test]
fn repeated_title_keeps_last_link() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({
        "_links": {
            "child": [
                {"title": "users", "href": "users"},
                {"title": "users", "href": "people"}
            ]
        }
    }));

    let catalog = discover(&transport).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.resource("users").unwrap().url(), format!("{SERVICE}/people"));
}

#[test]
fn discovery_failure_propagates_transport_error() {
    let transport = ScriptedTransport::new();
    transport.fail(401, "unauthorized");

    let err = discover(&transport).unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[test]
fn invalid_url_fails_before_any_request() {
    let transport = ScriptedTransport::new();
    let dyn_transport: Arc<dyn Transport> = transport.clone();

    let err = Catalog::discover("not a url", dyn_transport).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn query_options_reach_every_resource() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({
        "_links": {"child": [{"title": "users", "href": "users"}, {"title": "cities", "href": "cities"}]}
    }));
    let dyn_transport: Arc<dyn Transport> = transport.clone();

    let catalog =
        Catalog::discover_with(SERVICE, dyn_transport, QueryOptions::unbounded()).unwrap();

    for resource in catalog.resources() {
        assert_eq!(resource.options().max_pages, None);
    }
}

#[test]
fn discovered_resources_share_the_transport() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({"_links": {"child": [{"title": "users", "href": "users"}]}}));
    transport.reply(json!({"_items": []}));

    let catalog = discover(&transport).unwrap();
    let items = catalog.resource("users").unwrap().all().unwrap();

    assert!(items.is_empty());
    assert_eq!(transport.request_count(), 2);
}
