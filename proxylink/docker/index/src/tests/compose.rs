use super::*;
use crate::compose::{container_link, container_links, Membership};
use maplit::btreemap;
use proxylink_core::{EnvVar, Error, LinkedServices};

#[test]
fn membership_from_network_links() {
    let _tracing = init_tracing();

    let proxy = mk_compose_proxy(
        "shop",
        &[
            ("shop_default", &["shop_web_1:web", "shop_web_2:web", "shop_db_1:db"]),
            ("shop_backend", &["shop_cache_1:cache", "billing_api_1:api"]),
        ],
    );
    let membership = Membership::from_proxy(&proxy, &LinkedServices::default()).unwrap();
    assert_eq!(membership.project, "shop");
    // Networks are visited by name, so `shop_backend` comes first.
    assert_eq!(membership.services, vec!["cache", "web", "db"]);
    assert_eq!(
        membership.qualified_services().collect::<Vec<_>>(),
        vec!["shop_cache", "shop_web", "shop_db"]
    );
}

#[test]
fn membership_respects_linked_services() {
    let proxy = mk_compose_proxy(
        "shop",
        &[("shop_default", &["shop_db_1:db", "shop_cache_1:cache"])],
    );
    let membership = Membership::from_proxy(&proxy, &LinkedServices::parse("db:5432")).unwrap();
    assert_eq!(membership.services, vec!["db"]);
}

#[test]
fn membership_requires_project_label() {
    let proxy = mk_container(PROXY_ID, "/proxy", &[]);
    let error = Membership::from_proxy(&proxy, &LinkedServices::default()).unwrap_err();
    assert!(matches!(
        error,
        Error::MissingOrchestrationIdentity {
            label: labels::COMPOSE_PROJECT
        }
    ));
}

#[test]
fn links_matching_containers() {
    let _tracing = init_tracing();

    let client = snapshot([
        mk_compose_proxy("shop", &[("shop_default", &["shop_db_1:db"])]),
        mk_compose_container("c-db", "shop", "db", 1, &["5432/tcp"]),
        mk_compose_container("c-web", "shop", "web", 1, &["80/tcp"]),
        mk_compose_container("c-other", "billing", "db", 1, &["5432/tcp"]),
        mk_container("c-plain", "/plain", &[]),
    ]);

    let links = container_links(
        &client,
        "shop",
        &["db".to_string()],
        &LinkedServices::default(),
    )
    .unwrap();
    assert_eq!(links.len(), 1);
    let db = links.get("c-db").expect("db must be linked");
    assert_eq!(db.service_name, "shop_db");
    assert_eq!(db.container_name, "shop_db_1");
}

#[test]
fn no_matching_containers_is_empty() {
    let client = snapshot([mk_compose_container("c-web", "shop", "web", 1, &["80/tcp"])]);
    let links = container_links(
        &client,
        "shop",
        &["db".to_string()],
        &LinkedServices::default(),
    )
    .unwrap();
    assert!(links.is_empty());
}

#[test]
fn container_link_uses_exposed_ports() {
    let mut container = mk_compose_container("c-dns", "shop", "dns", 2, &["53/udp", "53/tcp"]);
    container.config.env = vec!["ZONE=shop.internal".to_string(), "DEBUG".to_string()];

    let link = container_link(&container, &LinkedServices::default());
    assert_eq!(link.id, "c-dns");
    assert_eq!(link.service_name, "shop_dns");
    assert_eq!(link.container_name, "shop_dns_2");
    assert_eq!(link.source_project, "shop");
    assert_eq!(link.source_service, "dns");
    assert_eq!(
        link.endpoints,
        btreemap! {
            "53/tcp".to_string() => "tcp://shop_dns_2:53".to_string(),
            "53/udp".to_string() => "udp://shop_dns_2:53".to_string(),
        }
    );
    assert_eq!(
        link.env_vars,
        vec![
            EnvVar {
                key: "ZONE".to_string(),
                value: "shop.internal".to_string(),
            },
            EnvVar {
                key: "DEBUG".to_string(),
                value: String::new(),
            },
        ]
    );
}

#[test]
fn container_link_prefers_linked_service_targets() {
    let container = mk_compose_container("c-web", "shop", "web", 1, &["80/tcp", "443/tcp"]);

    let link = container_link(&container, &LinkedServices::parse("web:8080,9090/udp"));
    assert_eq!(
        link.endpoints,
        btreemap! {
            "8080".to_string() => "tcp://shop_web_1:8080".to_string(),
            "9090/udp".to_string() => "udp://shop_web_1:9090".to_string(),
        }
    );

    // Listing the service without targets keeps its exposed ports.
    let link = container_link(&container, &LinkedServices::parse("web"));
    assert_eq!(link.endpoints.len(), 2);
}

#[test]
fn container_link_keeps_explicit_urls() {
    let mut container = mk_compose_container("c-web", "shop", "web", 1, &[]);
    container.config.exposed_ports = btreemap! {
        "80/tcp".to_string() => Some("http://web.shop.internal".to_string()),
    };

    let link = container_link(&container, &LinkedServices::default());
    assert_eq!(
        link.endpoints,
        btreemap! { "80/tcp".to_string() => "http://web.shop.internal".to_string() }
    );
}
