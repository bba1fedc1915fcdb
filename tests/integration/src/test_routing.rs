//! Routing behavior over the wire: matches, 404s, 405s, re-registration.

#[cfg(test)]
mod tests {
    use simplex_core::Method;
    use simplex_http::Router;

    use crate::{header_value, send_raw, split_response, start_server};

    fn hello_router() -> Router {
        let mut router = Router::new();
        router.route("/", &[Method::Get], |_| Ok("Hello World".into()));
        router
    }

    #[tokio::test]
    async fn test_should_serve_registered_route() {
        let addr = start_server(hello_router()).await;

        let raw = send_raw(addr, b"GET / HTTP/1.1\r\nHost: test\r\n\r\n").await;
        let (status_line, headers, body) = split_response(&raw);

        assert_eq!(status_line, "HTTP/1.1 200 OK");
        assert_eq!(
            header_value(&headers, "Content-Type"),
            Some("text/html;charset=utf-8")
        );
        assert_eq!(body, "Hello World");
    }

    #[tokio::test]
    async fn test_should_return_404_for_unregistered_path() {
        let addr = start_server(hello_router()).await;

        let raw = send_raw(addr, b"GET /missing HTTP/1.1\r\n\r\n").await;
        let (status_line, _, body) = split_response(&raw);

        assert_eq!(status_line, "HTTP/1.1 404 Not Found");
        assert!(body.contains("Not Found"));
    }

    #[tokio::test]
    async fn test_should_return_404_for_any_method_on_unknown_path() {
        let addr = start_server(hello_router()).await;

        for method in ["GET", "POST", "PUT", "DELETE", "PATCH"] {
            let request = format!("{method} /ghost HTTP/1.1\r\n\r\n");
            let raw = send_raw(addr, request.as_bytes()).await;
            let (status_line, _, _) = split_response(&raw);
            assert!(
                status_line.contains(" 404 "),
                "method {method} gave {status_line}"
            );
        }
    }

    #[tokio::test]
    async fn test_should_return_405_for_disallowed_method() {
        let mut router = Router::new();
        router.route("/data", &[Method::Post], |_| Ok("posted".into()));
        let addr = start_server(router).await;

        let raw = send_raw(addr, b"GET /data HTTP/1.1\r\n\r\n").await;
        let (status_line, _, body) = split_response(&raw);

        assert_eq!(status_line, "HTTP/1.1 405 Method Not Allowed");
        assert!(body.contains("Method Not Allowed"));
    }

    #[tokio::test]
    async fn test_should_serve_every_allowed_method() {
        let mut router = Router::new();
        router.route("/multi", &[Method::Get, Method::Post, Method::Put], |req| {
            Ok(req.method.clone().into())
        });
        let addr = start_server(router).await;

        for method in ["GET", "POST", "PUT"] {
            let request = format!("{method} /multi HTTP/1.1\r\n\r\n");
            let raw = send_raw(addr, request.as_bytes()).await;
            let (status_line, _, body) = split_response(&raw);
            assert_eq!(status_line, "HTTP/1.1 200 OK", "failed for {method}");
            assert_eq!(body, method);
        }

        let raw = send_raw(addr, b"DELETE /multi HTTP/1.1\r\n\r\n").await;
        assert!(split_response(&raw).0.contains(" 405 "));
    }

    #[tokio::test]
    async fn test_should_use_latest_registration_for_path() {
        let mut router = Router::new();
        router.route("/page", &[Method::Get], |_| Ok("first".into()));
        router.route("/page", &[Method::Get], |_| Ok("second".into()));
        let addr = start_server(router).await;

        let raw = send_raw(addr, b"GET /page HTTP/1.1\r\n\r\n").await;
        let (_, _, body) = split_response(&raw);

        assert_eq!(body, "second");
    }
}
