//! Declaration documents shared by integration tests.

use serde_json::{Value, json};

/// A single-service declaration for <https://httpbin.org/>.
///
/// Every resource except `status` declares exactly the method it is named
/// after. `status/codes` expands `{codes}` from its variables.
#[must_use]
pub fn httpbin() -> Value {
    json!({
        "name": "httpbin",
        "title": "httpbin.org",
        "description": "HTTP request and response service",
        "servers": [
            {"name": "production", "baseUrl": "https://httpbin.org/"},
            {"name": "local", "baseUrl": "http://localhost:8000/"}
        ],
        "resources": [
            {"name": "delete", "uri": "/delete", "delete": {}},
            {"name": "get", "uri": "/get", "get": {}},
            {"name": "patch", "uri": "/patch", "patch": {}},
            {
                "name": "post",
                "uri": "/post",
                "post": {
                    "headers": {"Content-Type": "application/json"},
                    "body": {"greeting": "hello ${var.who}"}
                },
                "vars": {"who": "world"}
            },
            {"name": "put", "uri": "/put", "put": {"body": "{{ var \"payload\" \"{}\" }}"}},
            {
                "name": "status",
                "uri": "/status",
                "resources": [
                    {"name": "codes", "uri": "{codes}", "vars": {"codes": "200"}}
                ]
            },
            {
                "name": "anything",
                "uri": "/anything",
                "post": {"form": {"name": "${var.who}", "tag": ["a", "b"]}},
                "vars": {"who": "ada"}
            }
        ]
    })
}

/// A scoped service with credentials and layered headers.
#[must_use]
pub fn scoped() -> Value {
    json!({
        "name": "@acme/api",
        "vars": {"tenant": "north", "user": "svc-user"},
        "auth": {"basic": {"user": "${var.user}", "password": "${env.ACME_PASSWORD}"}},
        "servers": [{
            "name": "prod",
            "baseUrl": "https://{tenant}.acme.example/v2/",
            "headers": {"X-Tenant": "${var.tenant}"}
        }],
        "resources": [{
            "name": "users",
            "uri": "users",
            "headers": {"Accept": "application/json", "+X-Trace": "users"},
            "get": {"headers": {"+X-Trace": "list"}},
            "resources": [{
                "name": "profile",
                "uri": "{id}/profile",
                "vars": {"id": "me"},
                "links": [{"href": "/help/{id}", "rel": "help", "isTemplate": true}]
            }]
        }]
    })
}

/// Two services in one `services` list document.
#[must_use]
pub fn catalogue() -> Value {
    json!({
        "services": [
            {
                "name": "alpha",
                "servers": [{"name": "main", "baseUrl": "https://alpha.example/"}],
                "resources": [{"name": "ping", "uri": "ping"}]
            },
            {
                "name": "beta",
                "servers": [{"name": "main", "baseUrl": "https://beta.example/"}]
            }
        ]
    })
}
