//! Pre-flight name checks over a whole model.
//!
//! Service, server, resource and endpoint names, and every variable key,
//! must start with a letter or underscore and continue with letters, digits,
//! underscores or dashes. Empty names are allowed: the synthetic root
//! resource and anonymous endpoints have none. A scoped service name
//! `@scope/name` must have exactly two parts that are each valid.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::{Endpoint, Model, ModelError, ModelResult, Resource, Service, Vars};

const BAD_IDENTIFIER: &str = "A name must start with a letter or underscore and may contain only \
                              letters, digits, underscores, and dashes.";
const BAD_QUALIFIED_IDENTIFIER: &str =
    "A package-scoped name must have two parts that each are valid identifiers";

#[expect(clippy::expect_used, reason = "the pattern is a fixed literal")]
fn identifier_pattern() -> Regex {
    Regex::new(r"^(?i)[_a-z][a-z0-9_-]*$").expect("identifier pattern compiles")
}

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(identifier_pattern);

fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

fn valid_name(name: &str) -> bool {
    name.is_empty() || is_identifier(name)
}

fn valid_qualified_name(name: &str) -> bool {
    name.strip_prefix('@').map_or_else(
        || valid_name(name),
        |scoped| {
            scoped
                .split_once('/')
                .is_some_and(|(scope, local)| is_identifier(scope) && is_identifier(local))
        },
    )
}

#[derive(Default)]
struct Checker {
    errors: Vec<Arc<ModelError>>,
}

impl Checker {
    fn fail(&mut self, key: String, message: &str) {
        self.errors
            .push(Arc::new(ModelError::validation(key, message)));
    }

    fn name(&mut self, key: String, name: &str) {
        if !valid_name(name) {
            self.fail(key, BAD_IDENTIFIER);
        }
    }

    fn vars(&mut self, owner: &str, vars: &Vars) {
        for name in vars.keys() {
            self.name(format!("{owner}.vars.{name}"), name);
        }
    }

    fn service(&mut self, service: &Service) {
        let key = service.name.as_str();
        if !valid_qualified_name(key) {
            let message = if key.starts_with('@') {
                BAD_QUALIFIED_IDENTIFIER
            } else {
                BAD_IDENTIFIER
            };
            self.fail(key.to_owned(), message);
        }
        for server in &service.servers {
            let server_key = format!("{key}.servers.{}", server.name);
            self.name(server_key.clone(), &server.name);
            self.vars(&server_key, &server.vars);
        }
        self.vars(key, &service.vars);
        self.resource(key, &service.resource);
    }

    fn resource(&mut self, parent: &str, resource: &Resource) {
        let key = if resource.name.is_empty() {
            parent.to_owned()
        } else {
            format!("{parent}/{}", resource.name)
        };
        self.name(key.clone(), &resource.name);
        self.vars(&key, &resource.vars);
        for endpoint in &resource.endpoints {
            self.endpoint(&key, endpoint);
        }
        for child in &resource.resources {
            self.resource(&key, child);
        }
    }

    fn endpoint(&mut self, resource: &str, endpoint: &Endpoint) {
        let key = format!("{resource}.{}", endpoint.method);
        if !endpoint.name.is_empty() {
            self.name(format!("{key}.{}", endpoint.name), &endpoint.name);
        }
        self.vars(&key, &endpoint.vars);
    }
}

/// Check every name in `model`.
///
/// # Errors
///
/// Returns [`ModelError::Validation`] for a single offending name, or
/// [`ModelError::Aggregate`] listing every offence when there are several.
pub fn validate(model: &Model) -> ModelResult<()> {
    let mut checker = Checker::default();
    for service in model.services() {
        checker.service(service);
    }
    ModelError::try_aggregate(checker.errors).map_or(Ok(()), |err| Err(Arc::new(err)))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{valid_name, valid_qualified_name, validate};
    use crate::{Endpoint, Model, ModelError, Resource, Server, Service, Vars};

    fn vars(value: serde_json::Value) -> Vars {
        match value {
            serde_json::Value::Object(map) => map,
            _ => Vars::new(),
        }
    }

    #[rstest]
    #[case("", true)]
    #[case("users", true)]
    #[case("_private", true)]
    #[case("Mixed-Case_9", true)]
    #[case("9lives", false)]
    #[case("has space", false)]
    #[case("dotted.name", false)]
    #[case("-dash", false)]
    fn checks_plain_names(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(valid_name(name), expected);
    }

    #[rstest]
    #[case("@acme/api", true)]
    #[case("plain", true)]
    #[case("@acme", false)]
    #[case("@acme/", false)]
    #[case("@/api", false)]
    #[case("@acme/api/extra", false)]
    #[case("@ac me/api", false)]
    fn checks_scoped_names(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(valid_qualified_name(name), expected);
    }

    fn service(name: &str) -> Service {
        Service {
            name: name.into(),
            resource: Resource {
                endpoints: vec![Endpoint::with_method("GET")],
                ..Resource::default()
            },
            ..Service::default()
        }
    }

    #[rstest]
    fn clean_model_passes() {
        let model = Model::from_services([service("ok"), service("@acme/api")]);
        assert!(validate(&model).is_ok());
    }

    #[rstest]
    fn single_offence_is_not_wrapped() {
        let model = Model::from_services([service("invalid name")]);
        let err = validate(&model).expect_err("bad service name");
        assert_eq!(
            err.to_string(),
            "validation failed for 'invalid name': A name must start with a letter or \
             underscore and may contain only letters, digits, underscores, and dashes."
        );
    }

    #[rstest]
    fn scoped_offence_uses_scoped_message() {
        let model = Model::from_services([service("@acme")]);
        let err = validate(&model).expect_err("bad scoped name");
        assert!(
            err.to_string().contains("A package-scoped name must have two parts"),
            "unexpected error: {err}"
        );
    }

    #[rstest]
    fn every_offence_is_collected() {
        let mut svc = service("svc");
        svc.vars = vars(json!({"ok": 1, "1bad": 2}));
        svc.servers.push(Server {
            name: "bad server".into(),
            ..Server::default()
        });
        svc.resource.resources.push(Resource {
            name: "items".into(),
            vars: vars(json!({"bad var": true})),
            endpoints: vec![Endpoint {
                name: "list all".into(),
                ..Endpoint::with_method("GET")
            }],
            ..Resource::default()
        });
        let err = validate(&Model::from_services([svc])).expect_err("four offences");
        let ModelError::Aggregate(errors) = &*err else {
            panic!("expected aggregate, got {err}");
        };
        let keys: Vec<_> = errors
            .iter()
            .filter_map(|e| match e {
                ModelError::Validation { key, .. } => Some(key.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            keys,
            [
                "svc.servers.bad server",
                "svc.vars.1bad",
                "svc/items.vars.bad var",
                "svc/items.GET.list all",
            ]
        );
    }
}
