use std::sync::Arc;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use hyper::header::AUTHORIZATION;
use hyper::http::request::Parts;
use hyper::Request;
use tempfile::NamedTempFile;

use super::*;
use crate::resolver::{FileResolverFactory, MockResolver, MockResolverFactory};

fn file_services() -> Services {
    Services::new(Arc::new(FileResolverFactory))
}

fn services_with_config(config: &str) -> Services {
    let config = Configuration::load_from_str(config).expect("Failed to parse test config");
    file_services().with_config(config)
}

fn build_test_parts(authorization: Option<&str>) -> Parts {
    let mut request = Request::builder();
    if let Some(authorization) = authorization {
        request = request.header(AUTHORIZATION, authorization);
    }

    let (parts, ()) = request.body(()).unwrap().into_parts();
    parts
}

fn accepting_basic_services() -> Services {
    let mut resolver = MockResolver::new();
    resolver
        .expect_resolve()
        .returning(|credentials, _| Ok(Some(format!("id_{}", credentials.username()))));
    let resolver = Arc::new(resolver);

    let mut resolvers = MockResolverFactory::new();
    resolvers
        .expect_basic()
        .returning(move |_| Ok(resolver.clone() as Arc<dyn crate::resolver::Resolver>));

    let config = Configuration::load_from_str(
        r#"
        [mvc_auth.authentication.http]
        accept_schemes = ["basic"]
        realm = "test"
        htpasswd = "/etc/app/htpasswd"
        "#,
    )
    .unwrap();

    Services::new(Arc::new(resolvers)).with_config(config)
}

fn oauth2_server(result: Option<&'static str>) -> Arc<dyn OAuth2Server> {
    let mut server = MockOAuth2Server::new();
    server
        .expect_verify_resource_request()
        .returning(move |_| Ok(result.map(ToString::to_string)));
    Arc::new(server)
}

#[test]
fn test_no_config_returns_listener_without_http_adapter() {
    let listener = select_authentication_mechanism(&file_services()).unwrap();
    assert!(listener.http_adapter().is_none());
    assert!(listener.oauth2_server().is_none());
}

#[test]
fn test_missing_sections_never_invoke_factory() {
    for config in ["", "[mvc_auth]", "[mvc_auth.authentication]"] {
        let mut resolvers = MockResolverFactory::new();
        resolvers.expect_basic().never();
        resolvers.expect_digest().never();

        let services = Services::new(Arc::new(resolvers))
            .with_config(Configuration::load_from_str(config).unwrap());
        let listener = select_authentication_mechanism(&services).unwrap();
        assert!(listener.http_adapter().is_none());
    }
}

#[test]
fn test_empty_http_section_raises_error() {
    let services = services_with_config("[mvc_auth.authentication.http]");

    let result = select_authentication_mechanism(&services);
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_digest_without_required_options_raises_error() {
    let services = services_with_config(
        r#"
        [mvc_auth.authentication.http]
        accept_schemes = ["digest"]
        realm = "test"
        "#,
    );

    let result = select_authentication_mechanism(&services);
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_basic_without_htpasswd_returns_listener_without_http_adapter() {
    let services = services_with_config(
        r#"
        [mvc_auth.authentication.http]
        accept_schemes = ["basic"]
        realm = "test"
        "#,
    );

    let listener = select_authentication_mechanism(&services).unwrap();
    assert!(listener.http_adapter().is_none());
}

#[test]
fn test_digest_without_htdigest_returns_listener_without_http_adapter() {
    let services = services_with_config(
        r#"
        [mvc_auth.authentication.http]
        accept_schemes = ["digest"]
        realm = "test"
        digest_domains = "/"
        nonce_timeout = 3600
        "#,
    );

    let listener = select_authentication_mechanism(&services).unwrap();
    assert!(listener.http_adapter().is_none());
}

#[test]
fn test_basic_with_htpasswd_returns_listener_with_http_adapter() {
    let htpasswd = NamedTempFile::new().unwrap();
    let services = services_with_config(&format!(
        r#"
        [mvc_auth.authentication.http]
        accept_schemes = ["basic"]
        realm = "My Web Site"
        digest_domains = "/"
        nonce_timeout = 3600
        htpasswd = "{}"
        "#,
        htpasswd.path().display()
    ));

    let listener = select_authentication_mechanism(&services).unwrap();
    let adapter = listener.http_adapter().unwrap();
    assert_eq!(adapter.realm(), "My Web Site");
    assert!(adapter.basic_resolver().is_some());
}

#[test]
fn test_digest_with_htdigest_returns_listener_with_http_adapter() {
    let htdigest = NamedTempFile::new().unwrap();
    let services = services_with_config(&format!(
        r#"
        [mvc_auth.authentication.http]
        accept_schemes = ["digest"]
        realm = "User Area"
        digest_domains = "/"
        nonce_timeout = 3600
        htdigest = "{}"
        "#,
        htdigest.path().display()
    ));

    let listener = select_authentication_mechanism(&services).unwrap();
    let adapter = listener.http_adapter().unwrap();
    assert_eq!(adapter.accept_schemes(), "digest");
    assert!(adapter.digest_resolver().is_some());
}

#[test]
fn test_preconfigured_oauth2_server_is_used() {
    let server = oauth2_server(None);
    let services = file_services().with_oauth2_server(server.clone());

    let listener = select_authentication_mechanism(&services).unwrap();
    assert!(listener.http_adapter().is_none());
    assert!(Arc::ptr_eq(listener.oauth2_server().unwrap(), &server));
}

#[test]
fn test_oauth2_server_alongside_http_adapter() {
    let services = accepting_basic_services().with_oauth2_server(oauth2_server(None));

    let listener = select_authentication_mechanism(&services).unwrap();
    assert!(listener.http_adapter().is_some());
    assert!(listener.oauth2_server().is_some());
}

#[tokio::test]
async fn test_authenticate_without_credentials_is_guest() {
    let listener = select_authentication_mechanism(&accepting_basic_services()).unwrap();

    let identity = listener.authenticate(&build_test_parts(None)).await.unwrap();
    assert!(identity.is_guest());
}

#[tokio::test]
async fn test_authenticate_basic() {
    let listener = select_authentication_mechanism(&accepting_basic_services()).unwrap();

    let header = format!("Basic {}", BASE64_STANDARD.encode("alice:secret"));
    let identity = listener
        .authenticate(&build_test_parts(Some(&header)))
        .await
        .unwrap();

    assert_eq!(identity.id, Some("id_alice".to_string()));
    assert_eq!(identity.username, Some("alice".to_string()));
    assert_eq!(identity.method, Some(AuthMethod::Basic));
}

#[tokio::test]
async fn test_authenticate_bearer() {
    let services = file_services().with_oauth2_server(oauth2_server(Some("client-1")));
    let listener = select_authentication_mechanism(&services).unwrap();

    let identity = listener
        .authenticate(&build_test_parts(Some("Bearer abc")))
        .await
        .unwrap();

    assert_eq!(identity.id, Some("client-1".to_string()));
    assert_eq!(identity.method, Some(AuthMethod::OAuth2));
}

#[tokio::test]
async fn test_authenticate_bearer_rejected() {
    let services = file_services().with_oauth2_server(oauth2_server(None));
    let listener = select_authentication_mechanism(&services).unwrap();

    let result = listener
        .authenticate(&build_test_parts(Some("Bearer expired")))
        .await;
    assert!(matches!(result, Err(Error::Unauthorized(_))));
}

#[tokio::test]
async fn test_authenticate_bearer_without_oauth2_server_is_guest() {
    let listener = select_authentication_mechanism(&accepting_basic_services()).unwrap();

    let identity = listener
        .authenticate(&build_test_parts(Some("Bearer abc")))
        .await
        .unwrap();
    assert!(identity.is_guest());
}

#[tokio::test]
async fn test_authenticate_basic_without_http_adapter_is_guest() {
    let services = file_services().with_oauth2_server(oauth2_server(Some("client-1")));
    let listener = select_authentication_mechanism(&services).unwrap();

    let header = format!("Basic {}", BASE64_STANDARD.encode("alice:secret"));
    let identity = listener
        .authenticate(&build_test_parts(Some(&header)))
        .await
        .unwrap();
    assert!(identity.is_guest());
}
