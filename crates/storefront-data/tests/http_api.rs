//! HTTP client behaviour against a scripted local server.

use storefront_commerce::checkout::{OrderRequest, PaymentMethod};
use storefront_commerce::{Money, ProductId};
use storefront_data::{ApiError, BackoffStrategy, CommerceApi, HttpCommerceApi, RetryPolicy, TimeoutConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

const PRODUCTS: &str = r#"{"total":1,"items":[{"id":"p1","description":"","image":"/a.svg","title":"HEX-леденец","category":"другое","price":1450}]}"#;

/// Serve one scripted response per connection, returning the raw requests.
async fn scripted(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.unwrap();
            requests.push(read_request(&mut stream).await);

            let reason = if status < 400 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        }
        requests
    });

    (format!("http://{}/api/weblarek", addr), handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn api(base_url: String) -> HttpCommerceApi {
    HttpCommerceApi::new(base_url, TimeoutConfig::default())
        .unwrap()
        .with_retry(RetryPolicy::new(2).with_backoff(BackoffStrategy::None))
}

fn order_request() -> OrderRequest {
    OrderRequest {
        payment: PaymentMethod::Online,
        email: "a@b.com".to_string(),
        phone: "+7 900 123 4567".to_string(),
        address: "Moscow".to_string(),
        total: Money::new(1450),
        items: vec![ProductId::new("p1")],
    }
}

#[tokio::test]
async fn test_fetch_products() {
    let (base, server) = scripted(vec![(200, PRODUCTS)]).await;

    let products = api(base).fetch_products().await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "HEX-леденец");
    assert_eq!(products[0].price, Some(Money::new(1450)));

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("GET /api/weblarek/product "));
}

#[tokio::test]
async fn test_fetch_retries_server_errors() {
    let (base, server) = scripted(vec![(503, r#"{"error":"busy"}"#), (200, PRODUCTS)]).await;

    let products = api(base).fetch_products().await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(server.await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_fetch_does_not_retry_client_errors() {
    let (base, server) = scripted(vec![(404, r#"{"error":"Not found"}"#)]).await;

    let err = api(base).fetch_products().await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    match err {
        ApiError::Http { message, url, .. } => {
            assert_eq!(message, "Not found");
            assert!(url.ends_with("/api/weblarek/product"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(server.await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_submit_order() {
    let (base, server) = scripted(vec![(200, r#"{"id":"order-1","total":1450}"#)]).await;

    let receipt = api(base).submit_order(&order_request()).await.unwrap();

    assert_eq!(receipt.id.as_str(), "order-1");
    assert_eq!(receipt.total, Money::new(1450));

    let requests = server.await.unwrap();
    assert!(requests[0].starts_with("POST /api/weblarek/order "));
    assert!(requests[0].contains(r#""payment":"online""#));
    assert!(requests[0].contains(r#""items":["p1"]"#));
}

#[tokio::test]
async fn test_submit_order_is_not_retried() {
    let (base, server) = scripted(vec![(500, r#"{"error":"Неверная сумма заказа"}"#)]).await;

    let err = api(base).submit_order(&order_request()).await.unwrap_err();

    assert!(err.is_server_error());
    assert!(err.to_string().contains("Неверная сумма заказа"));
    assert_eq!(server.await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unparseable_body() {
    let (base, _server) = scripted(vec![(200, "not json")]).await;

    let err = api(base).fetch_products().await.unwrap_err();

    assert!(matches!(err, ApiError::Parse(_)));
}
