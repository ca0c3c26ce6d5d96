use super::*;
use crate::{LinkResolver, Resolution};
use maplit::{btreemap, btreeset};
use proxylink_core::{Error, LinkedServices, Mode};

fn shop() -> Snapshot {
    snapshot([
        mk_compose_proxy("shop", &[("shop_default", &["shop_db_1:db"])]),
        mk_compose_container("c-db", "shop", "db", 1, &["5432/tcp"]),
        mk_compose_container("c-web", "shop", "web", 1, &["80/tcp"]),
        mk_compose_container("c-api", "billing", "api", 1, &["9000/tcp"]),
    ])
}

fn swarm() -> Snapshot {
    snapshot([mk_swarm_proxy(
        "svc-proxy",
        "shop",
        &[("ingress", "net-ingress"), ("shop_default", "net-shop")],
    )])
    .with_service(mk_service("svc-proxy", "shop_proxy", &[]))
    .with_service(mk_service("svc-web", "shop_web", &[]))
    .with_task(mk_task(
        "t-proxy-1",
        "svc-proxy",
        1,
        &[("net-ingress", &["10.255.0.2/16"]), ("net-shop", &["10.0.1.2/24"])],
        &[],
    ))
    .with_task(mk_task(
        "t-web-1",
        "svc-web",
        1,
        &[("net-shop", &["10.0.1.5/24"])],
        &["SERVICE_PORTS=80"],
    ))
}

#[test]
fn compose_end_to_end() {
    let _tracing = init_tracing();

    let resolver = LinkResolver::new(Mode::Compose, LinkedServices::default(), "");
    let resolution = resolver.resolve(&shop(), PROXY_ID).unwrap();

    assert_eq!(resolution.mode, Mode::Compose);
    assert_eq!(resolution.links.len(), 1);
    let db = resolution.links.get("c-db").expect("db must be linked");
    assert_eq!(db.service_name, "shop_db");
    assert_eq!(db.container_name, "shop_db_1");
    assert_eq!(
        db.endpoints,
        btreemap! { "5432/tcp".to_string() => "tcp://shop_db_1:5432".to_string() }
    );
    assert_eq!(resolution.services, btreeset! { "shop_db".to_string() });
    assert_eq!(resolution.service_names(), vec!["shop_db"]);
    assert_eq!(resolution.container_names(), vec!["shop_db_1"]);
    assert!(resolution.service_labels.is_empty());
}

#[test]
fn compose_requires_project_label() {
    let client = snapshot([mk_container(PROXY_ID, "/proxy", &[])]);
    let resolver = LinkResolver::new(Mode::Compose, LinkedServices::default(), "");
    assert!(matches!(
        resolver.resolve(&client, PROXY_ID),
        Err(Error::MissingOrchestrationIdentity { .. })
    ));
}

#[test]
fn query_failures_are_surfaced_outside_the_swarm_probe() {
    let resolver = LinkResolver::new(Mode::Compose, LinkedServices::default(), "");
    assert!(matches!(
        resolver.resolve(&Unavailable, PROXY_ID),
        Err(Error::OrchestrationQueryFailure(_))
    ));

    let resolver = LinkResolver::new(Mode::Auto, LinkedServices::default(), "");
    assert!(matches!(
        resolver.resolve(&Unavailable, PROXY_ID),
        Err(Error::OrchestrationQueryFailure(_))
    ));
}

#[test]
fn compose_merges_additional_links() {
    let _tracing = init_tracing();

    let resolver = LinkResolver::new(
        Mode::Compose,
        LinkedServices::default(),
        "billing:api, shop:missing, malformed",
    );
    let resolution = resolver.resolve(&shop(), PROXY_ID).unwrap();
    assert_eq!(
        resolution.links.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(),
        vec!["c-api", "c-db"]
    );
    assert_eq!(
        resolution.services,
        btreeset! { "billing_api".to_string(), "shop_db".to_string() }
    );
    assert_eq!(resolution.service_names(), vec!["billing_api", "shop_db"]);
}

#[test]
fn manual_mode_only_links_declared_targets() {
    let resolver = LinkResolver::new(Mode::Manual, LinkedServices::default(), "shop:web");
    let resolution = resolver.resolve(&shop(), PROXY_ID).unwrap();
    assert_eq!(resolution.mode, Mode::Manual);
    assert_eq!(resolution.container_names(), vec!["shop_web_1"]);
    assert_eq!(resolution.services, btreeset! { "shop_web".to_string() });

    let resolver = LinkResolver::new(Mode::Manual, LinkedServices::default(), "");
    assert_eq!(
        resolver.resolve(&shop(), PROXY_ID).unwrap(),
        Resolution {
            mode: Mode::Manual,
            ..Default::default()
        }
    );
}

#[test]
fn auto_prefers_swarm() {
    let _tracing = init_tracing();

    let resolver = LinkResolver::new(Mode::Auto, LinkedServices::default(), "shop:db");
    let resolution = resolver.resolve(&swarm(), PROXY_ID).unwrap();
    assert_eq!(resolution.mode, Mode::Swarm);
    assert_eq!(resolution.container_names(), vec!["shop_web.1.t-web-1"]);
    assert_eq!(resolution.services, btreeset! { "shop_web".to_string() });
    assert_eq!(
        resolution.links.get("t-web-1").unwrap().endpoints,
        btreemap! { "80/tcp".to_string() => "tcp://10.0.1.5:80".to_string() }
    );
    assert!(resolution.service_labels.contains_key("t-web-1"));
}

#[test]
fn auto_falls_back_to_compose() {
    let resolver = LinkResolver::new(Mode::Auto, LinkedServices::default(), "");
    let resolution = resolver.resolve(&shop(), PROXY_ID).unwrap();
    assert_eq!(resolution.mode, Mode::Compose);
    assert_eq!(resolution.service_names(), vec!["shop_db"]);
}

#[test]
fn auto_falls_back_to_additional_links() {
    let client = snapshot([
        mk_container(PROXY_ID, "/proxy", &[]),
        mk_compose_container("c-web", "shop", "web", 1, &["80/tcp"]),
    ]);
    let resolver = LinkResolver::new(Mode::Auto, LinkedServices::default(), "shop:web");
    let resolution = resolver.resolve(&client, PROXY_ID).unwrap();
    assert_eq!(resolution.mode, Mode::Manual);
    assert_eq!(resolution.container_names(), vec!["shop_web_1"]);
}

#[test]
fn swarm_mode_without_swarm_proxy_is_empty() {
    let resolver = LinkResolver::new(Mode::Swarm, LinkedServices::default(), "");
    let resolution = resolver.resolve(&shop(), PROXY_ID).unwrap();
    assert_eq!(resolution.mode, Mode::Swarm);
    assert!(resolution.links.is_empty());
}

#[test]
fn resolution_is_idempotent() {
    for (mode, client) in [(Mode::Compose, shop()), (Mode::Swarm, swarm())] {
        let resolver = LinkResolver::new(mode, LinkedServices::parse("db;web"), "billing:api");
        let first = resolver.resolve(&client, PROXY_ID).unwrap();
        let second = resolver.resolve(&client, PROXY_ID).unwrap();
        assert_eq!(first, second, "{}", mode);
        assert_eq!(first.service_names(), second.service_names());
        assert_eq!(first.container_names(), second.container_names());
        assert!(!first.links.is_empty(), "{}", mode);
    }
}

#[test]
fn serializes_for_rendering() {
    let resolver = LinkResolver::new(Mode::Compose, LinkedServices::default(), "");
    let resolution = resolver.resolve(&shop(), PROXY_ID).unwrap();
    let json = serde_json::to_value(&resolution).unwrap();
    assert_eq!(json["mode"], "compose");
    assert_eq!(json["links"]["c-db"]["service_name"], "shop_db");
    assert_eq!(
        json["links"]["c-db"]["endpoints"]["5432/tcp"],
        "tcp://shop_db_1:5432"
    );
    assert_eq!(json["services"], serde_json::json!(["shop_db"]));
}
