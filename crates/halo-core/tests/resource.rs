//! Resource fetch and pagination tests.

mod common;

use common::{SERVICE, ScriptedTransport, users};
use halo_core::{Body, Error, Method, QueryOptions};
use serde_json::json;

fn user(id: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "etag": format!("etag-{id}"),
        "name": format!("user {id}"),
        "_links": {"self": {"href": format!("users/{id}")}}
    })
}

#[test]
fn get_fetches_by_identifier() {
    let transport = ScriptedTransport::new();
    transport.reply(user("abc"));

    let item = users(&transport).get("abc").unwrap();

    assert_eq!(item.id().unwrap().as_str(), "abc");
    assert_eq!(item.etag().unwrap().as_str(), "etag-abc");
    assert_eq!(item.get("name").unwrap(), "user abc");
    assert!(item.is_persisted());

    let request = transport.last_request();
    assert_eq!(request.method, Method::Get);
    assert_eq!(request.url, format!("{SERVICE}/users/abc"));
}

#[test]
fn get_missing_item_surfaces_not_found() {
    let transport = ScriptedTransport::new();
    transport.fail(404, r#"{"_status": "ERR", "_error": {"code": 404}}"#);

    let err = users(&transport).get("nope").unwrap_err();

    assert!(err.is_not_found());
    match err {
        Error::Request(err) => {
            assert_eq!(err.method, Method::Get);
            assert_eq!(err.url, format!("{SERVICE}/users/nope"));
        }
        other => panic!("expected request error, got {other:?}"),
    }
}

#[test]
fn get_rejects_non_object_body() {
    let transport = ScriptedTransport::new();
    transport.reply_body(Body::Text("<html>".to_string()));

    let err = users(&transport).get("abc").unwrap_err();
    assert!(matches!(err, Error::NotReadable { .. }));
}

#[test]
fn all_follows_next_links_in_order() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({
        "_items": [user("1"), user("2")],
        "_links": {"next": {"href": "users?page=2"}}
    }));
    transport.reply(json!({
        "_items": [user("3"), user("4")],
        "_links": {"next": {"href": "users?page=3"}, "prev": {"href": "users"}}
    }));
    transport.reply(json!({
        "_items": [user("5")],
        "_links": {"prev": {"href": "users?page=2"}}
    }));

    let items = users(&transport).all().unwrap();

    let ids: Vec<&str> = items.iter().map(|i| i.id().unwrap().as_str()).collect();
    assert_eq!(ids, ["1", "2", "3", "4", "5"]);

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        [
            format!("{SERVICE}/users"),
            format!("{SERVICE}/users?page=2"),
            format!("{SERVICE}/users?page=3"),
        ]
    );
}

#[test]
fn find_sends_filter_on_first_request_only() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({
        "_items": [user("1")],
        "_links": {"next": {"href": "users?where=name%3D%3D%22foo%22&page=2"}}
    }));
    transport.reply(json!({"_items": [user("2")], "_links": {}}));

    let items = users(&transport)
        .find([("where", r#"name=="foo""#)])
        .unwrap();
    assert_eq!(items.len(), 2);

    let requests = transport.requests();
    assert_eq!(
        requests[0].params,
        vec![("where".to_string(), r#"name=="foo""#.to_string())]
    );
    assert!(requests[1].params.is_empty());
    assert_eq!(
        requests[1].url,
        format!("{SERVICE}/users?where=name%3D%3D%22foo%22&page=2")
    );
}

#[test]
fn page_without_items_or_links_ends_traversal() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({"_meta": {"total": 0}}));

    let items = users(&transport).all().unwrap();
    assert!(items.is_empty());
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn malformed_page_fails_fast() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({
        "_items": [user("1")],
        "_links": {"next": {"href": "users?page=2"}}
    }));
    transport.reply_body(Body::Empty);

    match users(&transport).all() {
        Err(Error::NotReadable { url, .. }) => assert_eq!(url, format!("{SERVICE}/users?page=2")),
        other => panic!("expected NotReadable, got {other:?}"),
    }
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn items_must_be_a_list_of_objects() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({"_items": {"not": "a list"}}));
    assert!(matches!(users(&transport).all(), Err(Error::NotReadable { .. })));

    let transport = ScriptedTransport::new();
    transport.reply(json!({"_items": [user("1"), "oops"]}));
    assert!(matches!(users(&transport).all(), Err(Error::NotReadable { .. })));
}

#[test]
fn self_referential_next_link_is_detected() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({
        "_items": [user("1")],
        "_links": {"next": {"href": "users?page=2"}}
    }));
    transport.reply(json!({
        "_items": [user("2")],
        "_links": {"next": {"href": "users?page=2"}}
    }));

    let err = users(&transport).all().unwrap_err();

    assert!(matches!(err, Error::NotReadable { .. }));
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn page_cap_stops_runaway_traversal() {
    let transport = ScriptedTransport::new();
    for page in 2..=4 {
        transport.reply(json!({
            "_items": [user(&page.to_string())],
            "_links": {"next": {"href": format!("users?page={page}")}}
        }));
    }

    let resource = users(&transport).with_options(QueryOptions::default().max_pages(3));
    match resource.all() {
        Err(Error::PaginationLimit { url, pages }) => {
            assert_eq!(pages, 3);
            assert_eq!(url, format!("{SERVICE}/users?page=4"));
        }
        other => panic!("expected PaginationLimit, got {other:?}"),
    }
    assert_eq!(transport.request_count(), 3);
}

#[test]
fn pages_yield_one_batch_per_request() {
    let transport = ScriptedTransport::new();
    transport.reply(json!({
        "_items": [user("1"), user("2")],
        "_links": {"next": {"href": "/v1/users?page=2"}}
    }));
    transport.reply(json!({"_items": [user("3")]}));

    let resource = users(&transport);
    let mut pages = resource.pages(Vec::new());

    assert_eq!(pages.next().unwrap().unwrap().len(), 2);
    assert_eq!(transport.request_count(), 1);
    assert_eq!(pages.next().unwrap().unwrap().len(), 1);
    assert!(pages.next().is_none());
    assert_eq!(pages.fetched(), 2);
}

#[test]
fn transport_errors_stop_traversal() {
    let transport = ScriptedTransport::new();
    transport.fail(500, "boom");

    let err = users(&transport).all().unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[test]
fn new_item_is_bound_to_resource() {
    let transport = ScriptedTransport::new();
    let item = users(&transport).new_item();
    assert_eq!(item.resource_name(), "users");
    assert!(item.is_new());
}
