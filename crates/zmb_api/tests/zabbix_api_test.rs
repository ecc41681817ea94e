//! 针对伪造 Zabbix JSON-RPC 端点的集成测试

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use zmb_api::{ZabbixClient, ZabbixConfig};
use zmb_core::Mapping;
use zmb_map::{build_map, publish_map, FixedPolicy, MapOptions, Resolution};

#[derive(Clone, Default)]
struct FakeZabbix {
    /// (method, Authorization header)
    calls: Arc<Mutex<Vec<(String, Option<String>)>>>,
    /// (sysmapid, name)
    maps: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeZabbix {
    fn methods(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }

    fn auth_of(&self, method: &str) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(m, _)| m == method)
            .and_then(|(_, auth)| auth.clone())
    }
}

fn rpc_result(id: &Value, result: Value) -> Json<Value> {
    Json(json!({ "jsonrpc": "2.0", "result": result, "id": id }))
}

fn rpc_error(id: &Value, data: &str) -> Json<Value> {
    Json(json!({
        "jsonrpc": "2.0",
        "error": { "code": -32602, "message": "Invalid params.", "data": data },
        "id": id
    }))
}

fn filter_table(table: &[(&str, &str)], wanted: &Value, id_key: &str, name_key: &str) -> Value {
    let wanted: Vec<&str> = wanted
        .as_array()
        .map(|a| a.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();
    Value::Array(
        table
            .iter()
            .filter(|(name, _)| wanted.contains(name))
            .map(|(name, id)| json!({ id_key: id, name_key: name }))
            .collect(),
    )
}

async fn handle(State(state): State<FakeZabbix>, headers: HeaderMap, body: String) -> Json<Value> {
    let request: Value = serde_json::from_str(&body).unwrap();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    let id = request["id"].clone();
    let params = &request["params"];
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    state.calls.lock().unwrap().push((method.clone(), auth));

    match method.as_str() {
        "apiinfo.version" => rpc_result(&id, json!("7.0.0")),
        "user.login" => {
            if params["password"] == "zabbix" {
                rpc_result(&id, json!("0424bd59b807674191e7d77572075f33"))
            } else {
                rpc_error(&id, "Incorrect user name or password or account is temporarily blocked.")
            }
        }
        "user.logout" => rpc_result(&id, json!(true)),
        "host.get" => rpc_result(
            &id,
            filter_table(
                &[("router-1", "10"), ("router-2", "11")],
                &params["filter"]["host"],
                "hostid",
                "host",
            ),
        ),
        "image.get" => rpc_result(
            &id,
            filter_table(
                &[("Switch_(64)", "6"), ("Firewall_(64)", "5")],
                &params["filter"]["name"],
                "imageid",
                "name",
            ),
        ),
        "trigger.get" => {
            let host = params["hostids"][0].as_str().unwrap_or_default();
            let pattern = params["search"]["description"].as_str().unwrap_or_default();
            assert_eq!(params["searchWildcardsEnabled"], true);
            let ids = match (host, pattern) {
                (_, "Interface*") => json!([{"triggerid": "1"}, {"triggerid": "2"}]),
                ("10", "Interface eth0*") => json!([{"triggerid": "100"}]),
                ("11", "Interface eth1*") => json!([{"triggerid": "101"}]),
                _ => json!([]),
            };
            rpc_result(&id, ids)
        }
        "map.get" => {
            let name = params["filter"]["name"][0].as_str().unwrap_or_default();
            let found: Vec<Value> = state
                .maps
                .lock()
                .unwrap()
                .iter()
                .filter(|(_, n)| n == name)
                .map(|(sysmapid, n)| json!({ "sysmapid": sysmapid, "name": n }))
                .collect();
            rpc_result(&id, Value::Array(found))
        }
        "map.create" => {
            assert_eq!(params["selements"][0]["elementtype"], 0);
            let mut maps = state.maps.lock().unwrap();
            let sysmapid = (maps.len() + 1).to_string();
            maps.push((sysmapid.clone(), params["name"].as_str().unwrap_or_default().to_string()));
            rpc_result(&id, json!({ "sysmapids": [sysmapid] }))
        }
        "map.delete" => {
            let target = params[0].as_str().unwrap_or_default().to_string();
            state.maps.lock().unwrap().retain(|(sysmapid, _)| *sysmapid != target);
            rpc_result(&id, json!({ "sysmapids": [target] }))
        }
        other => rpc_error(&id, &format!("unknown method {other}")),
    }
}

async fn spawn(state: FakeZabbix) -> String {
    let app = Router::new()
        .route("/api_jsonrpc.php", post(handle))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api_jsonrpc.php")
}

async fn logged_in(state: &FakeZabbix) -> ZabbixClient {
    let url = spawn(state.clone()).await;
    let mut client = ZabbixClient::connect(ZabbixConfig::new(url)).await.unwrap();
    client.login("Admin", "zabbix").await.unwrap();
    client
}

#[tokio::test]
async fn test_connect_and_session() {
    let state = FakeZabbix::default();
    let mut client = logged_in(&state).await;
    assert!(client.is_authenticated());

    client.logout().await.unwrap();
    assert!(!client.is_authenticated());

    assert_eq!(state.methods(), vec!["apiinfo.version", "user.login", "user.logout"]);
    assert_eq!(state.auth_of("apiinfo.version"), None);
    assert_eq!(state.auth_of("user.login"), None);
    assert_eq!(
        state.auth_of("user.logout").as_deref(),
        Some("Bearer 0424bd59b807674191e7d77572075f33")
    );
}

#[tokio::test]
async fn test_login_rejected() {
    let state = FakeZabbix::default();
    let url = spawn(state.clone()).await;
    let mut client = ZabbixClient::connect(ZabbixConfig::new(url)).await.unwrap();

    let err = client.login("Admin", "wrong").await.unwrap_err();
    assert!(err.to_string().contains("Incorrect user name or password"));
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_connect_unreachable() {
    let err = ZabbixClient::connect(ZabbixConfig::new("http://127.0.0.1:9/api_jsonrpc.php"))
        .await
        .err()
        .expect("connection should fail");
    assert!(err.to_string().contains("apiinfo.version"));
}

#[tokio::test]
async fn test_lookups() {
    let state = FakeZabbix::default();
    let client = logged_in(&state).await;

    let hosts = client
        .host_ids(&["router-1".to_string(), "router-3".to_string()])
        .await
        .unwrap();
    assert_eq!(hosts, HashMap::from([("router-1".to_string(), "10".to_string())]));

    let images = client.image_ids(&["Switch_(64)".to_string()]).await.unwrap();
    assert_eq!(images["Switch_(64)"], "6");

    assert_eq!(client.search_triggers("10", "Interface eth0*").await.unwrap(), vec!["100"]);
    assert_eq!(client.search_triggers("10", "Interface*").await.unwrap().len(), 2);
    assert!(client.search_triggers("10", "nothing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_build_and_publish_with_rename() {
    let state = FakeZabbix::default();
    state
        .maps
        .lock()
        .unwrap()
        .push(("42".to_string(), "core-network".to_string()));
    let client = logged_in(&state).await;

    let mappings = vec![Mapping {
        local_host: "router-1".to_string(),
        local_interface: "eth0".to_string(),
        local_trigger_pattern: "Interface eth0*".to_string(),
        local_image: "Firewall_(64)".to_string(),
        remote_host: "router-2".to_string(),
        remote_interface: "eth1".to_string(),
        remote_trigger_pattern: "Interface eth1*".to_string(),
        remote_image: "Switch_(64)".to_string(),
    }];
    let hosts = client
        .host_ids(&zmb_core::mapping::unique_hosts(&mappings))
        .await
        .unwrap();
    let images = client
        .image_ids(&zmb_core::mapping::unique_images(&mappings))
        .await
        .unwrap();

    let mut options = MapOptions {
        name: "core-network".to_string(),
        mappings,
        hosts,
        images,
        ..Default::default()
    };
    let mut request = build_map(&client, &mut options).await.unwrap();

    assert_eq!(request.links[0].linktriggers[0].triggerid, "100");
    assert_eq!(request.links[0].linktriggers[1].triggerid, "101");

    let sysmapid = publish_map(&client, &FixedPolicy(Resolution::Rename), &mut request)
        .await
        .unwrap();

    assert!(request.name.starts_with("core-network-"));
    let maps = state.maps.lock().unwrap().clone();
    assert_eq!(maps.len(), 2);
    assert!(maps.contains(&(sysmapid, request.name.clone())));
}

#[tokio::test]
async fn test_publish_with_replace() {
    let state = FakeZabbix::default();
    state
        .maps
        .lock()
        .unwrap()
        .push(("42".to_string(), "core-network".to_string()));
    let client = logged_in(&state).await;

    let mut request = zmb_core::MapCreateRequest::new("core-network", 800, 800);
    request
        .selements
        .push(zmb_core::Selement::host("10", "10", "6", 100, 100));

    publish_map(&client, &FixedPolicy(Resolution::Replace), &mut request)
        .await
        .unwrap();

    assert!(state.methods().contains(&"map.delete".to_string()));
    let maps = state.maps.lock().unwrap().clone();
    assert_eq!(maps, vec![("1".to_string(), "core-network".to_string())]);
}
