//! Transport client tests against a mock node.

use mockito::{Matcher, Server};
use neo2_rpc::client::Error;
use neo2_rpc::{RpcClient, UInt160};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::task::JoinSet;

fn rpc_result(result: Value) -> String {
    json!({"jsonrpc": "2.0", "id": 1, "result": result}).to_string()
}

fn first_request(method: &str, params: Value) -> Matcher {
    Matcher::Json(json!({"jsonrpc": "2.0", "id": 1, "method": method, "params": params}))
}

#[tokio::test]
async fn get_block_count_posts_jsonrpc_envelope() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_header("content-type", "application/json")
        .match_header("connection", "close")
        .match_body(first_request("getblockcount", json!([])))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!(2_345_678)))
        .create_async()
        .await;

    let client = RpcClient::new(server.url()).unwrap();
    assert_eq!(client.get_block_count().await.unwrap(), 2_345_678);
    mock.assert_async().await;
}

#[tokio::test]
async fn get_block_by_index_sends_verbosity_flag() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(first_request("getblock", json!([10, 1])))
        .with_body(rpc_result(json!({
            "hash": "0xd42561e3d30e15be6400b6df2f328e02d2bf6354c41dce433bc57687c82144bf",
            "size": 686,
            "version": 0,
            "previousblockhash": "0x0000000000000000000000000000000000000000000000000000000000000000",
            "merkleroot": "0x803ff4abe3ea6533bcc0be574efa02f83ae8fdc651c879056b0d9be336c01bf4",
            "time": 1_468_595_301,
            "index": 10,
            "nonce": "000000007c2bac1d",
            "nextconsensus": "APyEx5f4Zm4oCHwFWiSTaph1fPBxZacYVR",
            "script": {"invocation": "", "verification": "51"},
            "tx": [],
            "confirmations": 100,
            "nextblockhash": "0xd782db8a38b0eea0d7394e0f007c61c71798867578c77c387c08113903946cc9"
        })))
        .create_async()
        .await;

    let client = RpcClient::new(server.url()).unwrap();
    let block = client.get_block_by_index(10).await.unwrap();
    assert_eq!(block.header.index, 10);
    assert_eq!(block.header.confirmations, 100);
    assert!(block.tx.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn get_block_header_by_hash_sends_verbosity_flag() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(first_request("getblockheader", json!(["0xabc", 1])))
        .with_body(rpc_result(json!({
            "hash": "0xabc",
            "size": 100,
            "version": 0,
            "previousblockhash": "0xdef",
            "merkleroot": "0x123",
            "time": 1_468_595_301,
            "index": 3,
            "nonce": "01",
            "nextconsensus": "APyEx5f4Zm4oCHwFWiSTaph1fPBxZacYVR",
            "script": {"invocation": "", "verification": "51"}
        })))
        .create_async()
        .await;

    let client = RpcClient::new(server.url()).unwrap();
    let header = client.get_block_header_by_hash("0xabc").await.unwrap();
    assert_eq!(header.index, 3);
    assert_eq!(header.nextblockhash, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn invoke_script_decodes_stack() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(first_request("invokescript", json!(["00c1"])))
        .with_body(rpc_result(json!({
            "script": "00c1",
            "state": "HALT, BREAK",
            "gas_consumed": "0.126",
            "stack": [{"type": "ByteArray", "value": "4e454f"}]
        })))
        .create_async()
        .await;

    let client = RpcClient::new(server.url()).unwrap();
    let result = client.invoke_script("00c1", &[]).await.unwrap();
    assert!(!result.is_faulted());
    assert_eq!(result.gas_consumed, "0.126");
    assert_eq!(result.stack[0].item_type, "ByteArray");
    mock.assert_async().await;
}

#[tokio::test]
async fn get_tx_out_null_means_spent() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .match_body(first_request("gettxout", json!(["0x01", 0])))
        .with_body(rpc_result(Value::Null))
        .create_async()
        .await;

    let client = RpcClient::new(server.url()).unwrap();
    assert_eq!(client.get_tx_out("0x01", 0).await.unwrap(), None);
}

#[tokio::test]
async fn send_raw_transaction_appends_flag() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(first_request("sendrawtransaction", json!(["d101", 1])))
        .with_body(rpc_result(json!(true)))
        .create_async()
        .await;

    let client = RpcClient::new(server.url()).unwrap();
    assert!(client.send_raw_transaction("d101").await.unwrap());
    mock.assert_async().await;
}

#[tokio::test]
async fn get_state_root_by_index() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .match_body(first_request("getstateroot", json!([5])))
        .with_body(rpc_result(json!({
            "flag": "Verified",
            "stateroot": {
                "version": 0,
                "index": 5,
                "stateroot": "0x1f",
                "prehash": "0x2f",
                "witness": {"invocation": "40", "verification": "51"}
            }
        })))
        .create_async()
        .await;

    let client = RpcClient::new(server.url()).unwrap();
    let root = client.get_state_root_by_index(5).await.unwrap();
    assert_eq!(root.flag, "Verified");
    assert_eq!(root.stateroot.index, 5);
}

#[tokio::test]
async fn invoke_function_sends_typed_args() {
    let contract: UInt160 = "0xecc6b20d3ccac1ee9ef109af5a7cdb85706b1df9".parse().unwrap();
    let account = UInt160::from_le_bytes([0x11; 20]);

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(first_request(
            "invokefunction",
            json!([
                contract.to_string(),
                "balanceOf",
                [{"type": "Hash160", "value": account.to_hex_be()}]
            ]),
        ))
        .with_body(rpc_result(json!({
            "script": "",
            "state": "HALT",
            "gas_consumed": 0.2,
            "stack": [{"type": "Integer", "value": "5"}]
        })))
        .create_async()
        .await;

    let client = RpcClient::new(server.url()).unwrap();
    let result = client
        .invoke_function(&contract, "balanceOf", &[account.into()], &[])
        .await
        .unwrap();
    assert_eq!(result.gas_consumed, "0.2");
    mock.assert_async().await;
}

// ── Failures ────────────────────────────────────────────────────────

#[tokio::test]
async fn node_error_is_reported_as_rpc_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {"code": -100, "message": "Unknown block"}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = RpcClient::new(server.url()).unwrap();
    match client.get_block_by_hash("0xdead").await {
        Err(Error::Rpc(err)) => {
            assert_eq!(err.code, -100);
            assert_eq!(err.message, "Unknown block");
        }
        other => panic!("expected rpc error, got {other:?}"),
    }
}

#[tokio::test]
async fn wrong_result_shape_is_a_json_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_body(rpc_result(json!("not a number")))
        .create_async()
        .await;

    let client = RpcClient::new(server.url()).unwrap();
    assert!(matches!(
        client.get_block_count().await,
        Err(Error::Json(_))
    ));
}

#[tokio::test]
async fn non_json_error_page_reports_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let client = RpcClient::new(server.url()).unwrap();
    match client.get_version().await {
        Err(Error::Status(status)) => assert_eq!(status.as_u16(), 502),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn json_error_page_without_rpc_error_reports_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(json!({"message": "rate limited"}).to_string())
        .expect(2)
        .create_async()
        .await;

    let client = RpcClient::new(server.url()).unwrap();
    match client.get_storage("0x01", "6b6579").await {
        Err(Error::Status(status)) => assert_eq!(status.as_u16(), 429),
        other => panic!("expected status error, got {other:?}"),
    }
    match client.get_tx_out("0x01", 0).await {
        Err(Error::Status(status)) => assert_eq!(status.as_u16(), 429),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn envelope_without_result_is_a_json_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_body(json!({"jsonrpc": "2.0", "id": 1}).to_string())
        .create_async()
        .await;

    let client = RpcClient::new(server.url()).unwrap();
    assert!(matches!(
        client.get_storage("0x01", "6b6579").await,
        Err(Error::Json(_))
    ));
}

#[tokio::test]
async fn null_result_is_still_a_value() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .match_body(first_request("getstorage", json!(["0x01", "6b6579"])))
        .with_body(rpc_result(Value::Null))
        .create_async()
        .await;

    let client = RpcClient::new(server.url()).unwrap();
    assert_eq!(client.get_storage("0x01", "6b6579").await.unwrap(), None);
}

#[tokio::test]
async fn unreachable_node_is_an_http_error() {
    let client = RpcClient::new("http://127.0.0.1:1").unwrap();
    assert!(matches!(
        client.get_block_count().await,
        Err(Error::Http(_))
    ));
}

// ── Concurrency ─────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_keep_their_pairing() {
    const CALLS: u32 = 16;
    let mut server = Server::new_async().await;
    let mut mocks = Vec::new();
    for index in 0..CALLS {
        let mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(
                json!({"method": "getblockhash", "params": [index]}),
            ))
            .with_body(rpc_result(json!(format!("0x{index:064x}"))))
            .expect(1)
            .create_async()
            .await;
        mocks.push(mock);
    }

    let client = Arc::new(RpcClient::new(server.url()).unwrap());
    let mut tasks = JoinSet::new();
    for index in 0..CALLS {
        let client = Arc::clone(&client);
        tasks.spawn(async move { (index, client.get_block_hash(index).await) });
    }

    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined.unwrap();
        assert_eq!(result.unwrap(), format!("0x{index:064x}"));
    }
    for mock in mocks {
        mock.assert_async().await;
    }
}
