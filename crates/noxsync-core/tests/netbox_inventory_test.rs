// The `Inventory` seam over a real `NetboxClient`, against a mock server.

#![allow(clippy::unwrap_used)]

use noxsync_api::{NetboxClient, TransportConfig};
use noxsync_core::{CoreError, InterfaceWrite, Inventory, VlanMode, VlanRequest};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, NetboxClient) {
    let server = MockServer::start().await;
    let client = NetboxClient::new(
        &server.uri(),
        &SecretString::from("0123456789abcdef"),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

fn page(results: serde_json::Value) -> serde_json::Value {
    let count = results.as_array().map_or(0, Vec::len);
    json!({ "count": count, "next": null, "previous": null, "results": results })
}

#[tokio::test]
async fn devices_without_names_are_dropped() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dcim/devices/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([
            { "id": 1, "name": "fw01", "site": { "id": 10 }, "tenant": { "id": 20 } },
            { "id": 2, "name": null, "site": { "id": 10 } }
        ]))))
        .mount(&server)
        .await;

    let devices = Inventory::list_devices(&client).await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].name, "fw01");
    assert_eq!(devices[0].site_id, 10);
    assert_eq!(devices[0].tenant_id, Some(20));
}

#[tokio::test]
async fn interface_snapshot_is_converted() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dcim/interfaces/"))
        .and(query_param("device_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(json!([{
            "id": 5,
            "device": { "id": 1, "name": "fw01" },
            "name": "port1",
            "type": { "value": "1000base-t", "label": "1000BASE-T (1GE)" },
            "enabled": true,
            "description": "",
            "lag": { "id": 9, "name": "core-lag" },
            "mode": { "value": "tagged-all", "label": "Tagged (All)" },
            "tags": [{ "id": 3, "name": "noxsync", "slug": "noxsync" }]
        }]))))
        .mount(&server)
        .await;

    let interfaces = Inventory::list_interfaces(&client, 1).await.unwrap();
    assert_eq!(interfaces[0].lag.as_ref().map(|l| l.id), Some(9));
    assert_eq!(interfaces[0].mode, Some(VlanMode::TaggedAll));
    assert_eq!(interfaces[0].tags, [3]);
}

#[tokio::test]
async fn create_sends_resolved_write() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/dcim/interfaces/"))
        .and(body_json(json!({
            "device": 1,
            "name": "vl100",
            "type": "virtual",
            "parent": 9,
            "mode": "access",
            "untagged_vlan": 40,
            "tags": [3]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 77,
            "device": { "id": 1 },
            "name": "vl100",
            "type": { "value": "virtual" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let write = InterfaceWrite {
        port_type: Some("virtual".into()),
        parent: Some(9),
        mode: Some(VlanMode::Access),
        untagged_vlan: Some(40),
        tags: Some(vec![3]),
        ..InterfaceWrite::default()
    };
    let created = Inventory::create_interface(&client, 1, "vl100", &write)
        .await
        .unwrap();
    assert_eq!(created.id, 77);
    assert!(created.enabled);
}

#[tokio::test]
async fn vlan_is_created_active() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/ipam/vlans/"))
        .and(body_json(json!({
            "site": 10,
            "vid": 50,
            "name": "guests",
            "tenant": 20,
            "status": "active"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "id": 300, "vid": 50, "name": "guests" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let vlan = Inventory::create_vlan(
        &client,
        &VlanRequest {
            site_id: 10,
            tenant_id: Some(20),
            vid: 50,
            name: "guests".into(),
            tags: vec![],
        },
    )
    .await
    .unwrap();
    assert_eq!(vlan.id, 300);
}

#[tokio::test]
async fn forbidden_maps_to_authentication_failure() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/ipam/vlans/"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Invalid token"))
        .mount(&server)
        .await;

    let err = Inventory::list_vlans(&client, 10).await.unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
    assert!(err.is_remote());
}
