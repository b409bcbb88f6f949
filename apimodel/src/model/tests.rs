//! Unit tests for model construction and the declaration round trip.

use rstest::{fixture, rstest};

use super::{Auth, BasicAuth, Client, Endpoint, GrpcClient, Model};
use crate::{ModelError, config};

fn resource(name: &str) -> config::Resource {
    config::Resource {
        name: name.into(),
        uri: format!("/{name}"),
        ..config::Resource::default()
    }
}

#[fixture]
fn declarations() -> config::Config {
    let mut users = resource("users");
    users.post = Some(config::Endpoint::default());
    users.delete = Some(config::Endpoint::default());
    users.get = Some(config::Endpoint {
        name: "list".into(),
        ..config::Endpoint::default()
    });
    users.resources.push(resource("profile"));
    config::Config {
        services: vec![config::Service {
            name: "svc".into(),
            servers: vec![config::Server {
                name: "prod".into(),
                base_url: "https://api.example.com".into(),
                ..config::Server::default()
            }],
            resources: vec![users, resource("health")],
            client: Some(config::Client {
                http: None,
                grpc: Some(config::GrpcClient {
                    plaintext: true,
                    ..config::GrpcClient::default()
                }),
            }),
            ..config::Service::default()
        }],
    }
}

#[rstest]
fn root_resource_is_synthesised(declarations: config::Config) {
    let model = Model::new(&declarations);
    let svc = model.service("svc").expect("service present");
    assert_eq!(svc.resource.name, "");
    assert_eq!(svc.resource.uri, "");
    assert_eq!(svc.resource.endpoints, vec![Endpoint::with_method("GET")]);
    assert_eq!(svc.resource.resources.len(), 2);
}

#[rstest]
fn bare_resource_gets_exactly_one_get(declarations: config::Config) {
    let model = Model::new(&declarations);
    let health = model
        .service("svc")
        .and_then(|s| s.resource.resource("health"))
        .expect("health resource");
    let methods: Vec<_> = health.endpoints.iter().map(|e| e.method.as_str()).collect();
    assert_eq!(methods, ["GET"]);
}

#[rstest]
fn endpoints_follow_fixed_method_order(declarations: config::Config) {
    let model = Model::new(&declarations);
    let users = model
        .service("svc")
        .and_then(|s| s.resource.resource("users"))
        .expect("users resource");
    let methods: Vec<_> = users.endpoints.iter().map(|e| e.method.as_str()).collect();
    assert_eq!(methods, ["GET", "POST", "DELETE"]);
    assert_eq!(users.endpoint("post").map(|e| e.method.as_str()), Some("POST"));
    assert_eq!(users.endpoint("Get").map(|e| e.name.as_str()), Some("list"));
    assert!(users.endpoint("PATCH").is_none());
}

#[rstest]
fn client_is_bound_from_declaration(declarations: config::Config) {
    let model = Model::new(&declarations);
    let client = model.service("svc").and_then(|s| s.client.clone());
    assert_eq!(
        client,
        Some(Client::Grpc(GrpcClient {
            plaintext: true,
            ..GrpcClient::default()
        }))
    );
}

#[rstest]
fn lookups_are_exact_and_stable(declarations: config::Config) {
    let model = Model::new(&declarations);
    for _ in 0..3 {
        assert!(model.service("svc").is_some());
        assert!(model.service("SVC").is_none());
        assert!(model.service("sv").is_none());
    }
}

#[rstest]
fn duplicate_service_names_keep_the_last() {
    let config = config::Config {
        services: vec![
            config::Service {
                name: "dup".into(),
                title: "first".into(),
                ..config::Service::default()
            },
            config::Service {
                name: "other".into(),
                ..config::Service::default()
            },
            config::Service {
                name: "dup".into(),
                title: "second".into(),
                ..config::Service::default()
            },
        ],
    };
    let model = Model::new(&config);
    assert_eq!(model.len(), 2);
    assert_eq!(model.service("dup").map(|s| s.title.as_str()), Some("second"));
}

#[rstest]
fn round_trip_preserves_tree_shape(declarations: config::Config) {
    let model = Model::new(&declarations);
    let rebuilt = Model::new(&model.to_config().expect("convertible model"));
    assert_eq!(
        rebuilt.service("svc").map(|s| &s.resource),
        model.service("svc").map(|s| &s.resource)
    );
    assert_eq!(rebuilt.to_config().ok(), model.to_config().ok());
}

#[rstest]
fn custom_methods_cannot_be_written_back(declarations: config::Config) {
    let mut services = Model::new(&declarations).services().to_vec();
    let svc = services.first_mut().expect("service");
    svc.resource
        .resources
        .first_mut()
        .expect("users")
        .endpoints
        .push(Endpoint::with_method("PURGE"));
    let err = Model::from_services(services)
        .to_config()
        .expect_err("PURGE has no declaration key");
    assert!(
        matches!(&*err, ModelError::Conversion { path, .. } if path == "svc/users"),
        "unexpected error: {err}"
    );
}

#[rstest]
#[case("Aladdin", "open sesame", "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==")]
#[case("", "", "Basic Og==")]
fn basic_auth_renders_header(#[case] user: &str, #[case] password: &str, #[case] expected: &str) {
    let auth = Auth::Basic(BasicAuth {
        user: user.into(),
        password: password.into(),
    });
    assert_eq!(auth.authorization_header(), expected);
}
