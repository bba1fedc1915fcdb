//! Body handling over the wire: JSON echo, staggered delivery, length edges.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use simplex_core::Method;
    use simplex_http::{Response, ReturnValue, Router};

    use crate::{header_value, send_raw, send_raw_staggered, split_response, start_server};

    fn echo_router() -> Router {
        let mut router = Router::new();
        router.route("/echo", &[Method::Post], |request| {
            let body = request
                .json
                .clone()
                .ok_or_else(|| anyhow::anyhow!("expected a JSON body"))?;
            Ok(ReturnValue::Json(body))
        });
        router
    }

    #[tokio::test]
    async fn test_should_echo_json_request_body() {
        let addr = start_server(echo_router()).await;

        let raw = send_raw(
            addr,
            b"POST /echo HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: 7\r\n\r\n{\"a\":1}",
        )
        .await;
        let (status_line, headers, body) = split_response(&raw);

        assert_eq!(status_line, "HTTP/1.1 200 OK");
        assert_eq!(
            header_value(&headers, "Content-Type"),
            Some("application/json;charset=utf-8")
        );
        let parsed: serde_json::Value = serde_json::from_str(&body).expect("JSON response body");
        assert_eq!(parsed, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_should_wait_for_full_body_before_answering() {
        let addr = start_server(echo_router()).await;

        let raw = send_raw_staggered(
            addr,
            b"POST /echo HTTP/1.1\r\nContent-Type: application/json\r\nContent-Length: 16\r\n\r\n{\"long",
            b"\":\"value\"}",
        )
        .await;
        let (status_line, _, body) = split_response(&raw);

        assert_eq!(status_line, "HTTP/1.1 200 OK");
        let parsed: serde_json::Value = serde_json::from_str(&body).expect("JSON response body");
        assert_eq!(parsed, json!({"long": "value"}));
    }

    #[tokio::test]
    async fn test_should_truncate_body_to_declared_length() {
        let mut router = Router::new();
        router.route("/len", &[Method::Post], |request| {
            Ok(request.body.len().to_string().into())
        });
        let addr = start_server(router).await;

        let raw = send_raw(addr, b"POST /len HTTP/1.1\r\nContent-Length: 4\r\n\r\nabcdEXTRA").await;
        let (_, _, body) = split_response(&raw);

        assert_eq!(body, "4");
    }

    #[tokio::test]
    async fn test_should_default_to_empty_body_without_content_length() {
        let mut router = Router::new();
        router.route("/len", &[Method::Post], |request| {
            Ok(request.body.len().to_string().into())
        });
        let addr = start_server(router).await;

        let raw = send_raw(addr, b"POST /len HTTP/1.1\r\nHost: x\r\n\r\ntrailing-junk").await;
        let (_, _, body) = split_response(&raw);

        assert_eq!(body, "0");
    }

    #[tokio::test]
    async fn test_should_force_json_content_type_on_structured_response() {
        let mut router = Router::new();
        router.route("/forced", &[Method::Get], |_| {
            Ok(Response::json(json!({"ok": true}))
                .with_header("Content-Type", "text/html;charset=utf-8")
                .into())
        });
        let addr = start_server(router).await;

        let raw = send_raw(addr, b"GET /forced HTTP/1.1\r\n\r\n").await;
        let (_, headers, body) = split_response(&raw);

        assert_eq!(
            header_value(&headers, "Content-Type"),
            Some("application/json;charset=utf-8")
        );
        let parsed: serde_json::Value = serde_json::from_str(&body).expect("JSON response body");
        assert_eq!(parsed, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_should_expose_raw_body_without_json_content_type() {
        let mut router = Router::new();
        router.route("/raw", &[Method::Post], |request| {
            let text = String::from_utf8_lossy(&request.body).into_owned();
            Ok(format!("json={} body={text}", request.json.is_some()).into())
        });
        let addr = start_server(router).await;

        let raw = send_raw(
            addr,
            b"POST /raw HTTP/1.1\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhello",
        )
        .await;
        let (_, _, body) = split_response(&raw);

        assert_eq!(body, "json=false body=hello");
    }
}
