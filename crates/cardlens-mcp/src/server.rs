//! MCP dispatch: initialize, resources, and the two card tools.

use crate::catalog::CardCatalog;
use crate::protocol::{self, Request, Response};
use cardlens::ScrapePipeline;
use serde_json::{json, Value};
use tracing::{info, warn};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const CARD_LIST_URI: &str = "resource://card_list";

/// Stateless-per-request MCP server over an immutable catalog and the
/// scrape pipeline.
pub struct CardLensServer {
    catalog: CardCatalog,
    pipeline: ScrapePipeline,
}

impl CardLensServer {
    pub fn new(catalog: CardCatalog, pipeline: ScrapePipeline) -> Self {
        Self { catalog, pipeline }
    }

    /// Handle one stdin line. `None` means nothing is written back
    /// (blank lines and notifications).
    pub async fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "malformed request line");
                return Some(
                    Response::error(Value::Null, protocol::PARSE_ERROR, format!("parse error: {e}"))
                        .to_json(),
                );
            }
        };

        if request.is_notification() {
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        Some(self.dispatch(&request, id).await.to_json())
    }

    async fn dispatch(&self, request: &Request, id: Value) -> Response {
        match request.method.as_str() {
            "initialize" => Response::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": { "tools": {}, "resources": {} },
                    "serverInfo": {
                        "name": "cardlens-mcp",
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }),
            ),
            "ping" => Response::success(id, json!({})),
            "resources/list" => Response::success(
                id,
                json!({
                    "resources": [{
                        "uri": CARD_LIST_URI,
                        "name": "CardList",
                        "mimeType": "application/json",
                        "description": "Every known card with its detail page URL. Check whether the requested card is in this list and take its url from here."
                    }]
                }),
            ),
            "resources/read" => self.read_resource(request, id),
            "tools/list" => Response::success(id, tool_listing()),
            "tools/call" => self.call_tool(request, id).await,
            other => Response::error(
                id,
                protocol::METHOD_NOT_FOUND,
                format!("unknown method `{other}`"),
            ),
        }
    }

    fn read_resource(&self, request: &Request, id: Value) -> Response {
        let uri = request
            .params
            .as_ref()
            .and_then(|params| params.get("uri"))
            .and_then(Value::as_str);

        match uri {
            Some(CARD_LIST_URI) => {
                let text = serde_json::to_string(self.catalog.entries())
                    .unwrap_or_else(|_| "[]".to_string());
                Response::success(
                    id,
                    json!({
                        "contents": [{
                            "uri": CARD_LIST_URI,
                            "mimeType": "application/json",
                            "text": text
                        }]
                    }),
                )
            }
            Some(other) => Response::error(
                id,
                protocol::INVALID_PARAMS,
                format!("unknown resource uri `{other}`"),
            ),
            None => Response::error(id, protocol::INVALID_PARAMS, "missing `uri` parameter"),
        }
    }

    async fn call_tool(&self, request: &Request, id: Value) -> Response {
        let Some(params) = request.params.as_ref() else {
            return Response::error(id, protocol::INVALID_PARAMS, "missing params");
        };
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return Response::error(id, protocol::INVALID_PARAMS, "missing tool name");
        };
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        match name {
            "GetAllCardListInfo" => {
                info!(cards = self.catalog.len(), "listing card catalog");
                tool_text(id, json!({ "cards": self.catalog.entries() }), false)
            }
            "CardBenefitInfo" => self.card_benefit_info(&arguments, id).await,
            other => Response::error(
                id,
                protocol::INVALID_PARAMS,
                format!("unknown tool `{other}`"),
            ),
        }
    }

    async fn card_benefit_info(&self, arguments: &Value, id: Value) -> Response {
        let Some(url) = arguments.get("url").and_then(Value::as_str) else {
            return Response::error(
                id,
                protocol::INVALID_PARAMS,
                "missing required argument `url`",
            );
        };

        // Whitelist check before any browser is launched.
        let Some(entry) = self.catalog.lookup(url) else {
            info!(url, "requested URL is not in the card catalog");
            return tool_text(
                id,
                json!({
                    "error": format!(
                        "URL `{url}` is not in the card catalog; pick one from the CardList resource"
                    )
                }),
                true,
            );
        };

        info!(card = %entry.name, url, "scraping card benefits");
        let result = self.pipeline.scrape_result(url).await;
        let is_error = result.is_error();
        if is_error {
            warn!(url, "scrape failed");
        }

        match serde_json::to_value(&result) {
            Ok(value) => tool_text(id, value, is_error),
            Err(e) => Response::error(
                id,
                protocol::INTERNAL_ERROR,
                format!("serializing scrape result: {e}"),
            ),
        }
    }
}

/// Wrap a tool payload in the MCP content-block envelope.
fn tool_text(id: Value, payload: Value, is_error: bool) -> Response {
    Response::success(
        id,
        json!({
            "content": [{ "type": "text", "text": payload.to_string() }],
            "isError": is_error
        }),
    )
}

fn tool_listing() -> Value {
    json!({
        "tools": [
            {
                "name": "GetAllCardListInfo",
                "description": "List every known card with its detail page URL. Pick the card the user asked about from the returned list.",
                "inputSchema": {
                    "type": "object",
                    "properties": {},
                    "required": []
                }
            },
            {
                "name": "CardBenefitInfo",
                "description": "Fetch the detailed benefit information for one card. The url must be a value obtained from the CardList resource; arbitrary website URLs are rejected.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "url": {
                            "type": "string",
                            "description": "Card detail page URL taken from the CardList resource"
                        }
                    },
                    "required": ["url"]
                }
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CardCatalogEntry;
    use async_trait::async_trait;
    use cardlens::browser::{Browser, BrowserPage, ElementHandle};
    use cardlens::RenderOptions;
    use std::time::Duration;

    const FIXTURE_PAGE: &str = r#"
        <html><body>
          <strong class="card">Sample Card</strong>
          <div class="bene_area">
            <dl>
              <dt><p class="txt1">Shopping</p><i>5% cashback</i></dt>
              <dd>5% back at department stores</dd>
            </dl>
            <dl>
              <dt><p class="txt1">Travel</p><i>Lounge access</i></dt>
            </dl>
          </div>
        </body></html>
    "#;

    /// Serves a fixed page for any URL, no real browser involved.
    struct StubBrowser {
        html: String,
    }

    #[async_trait]
    impl Browser for StubBrowser {
        async fn open_page(&self) -> anyhow::Result<Box<dyn BrowserPage>> {
            Ok(Box::new(StubPage {
                html: self.html.clone(),
            }))
        }
    }

    struct StubPage {
        html: String,
    }

    #[async_trait]
    impl BrowserPage for StubPage {
        async fn navigate(&mut self, _url: &str, _timeout: Duration) -> anyhow::Result<()> {
            Ok(())
        }

        async fn wait_for(&mut self, _selector: &str, _timeout: Duration) -> anyhow::Result<()> {
            Ok(())
        }

        async fn query_all(&mut self, _selector: &str) -> anyhow::Result<Vec<ElementHandle>> {
            Ok(vec![ElementHandle(0), ElementHandle(1)])
        }

        async fn click(&mut self, _handle: ElementHandle) -> anyhow::Result<()> {
            Ok(())
        }

        async fn content(&mut self) -> anyhow::Result<String> {
            Ok(self.html.clone())
        }

        async fn close(self: Box<Self>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn test_server() -> CardLensServer {
        let catalog = CardCatalog::new(vec![CardCatalogEntry {
            name: "Sample Card".into(),
            url: "https://example.test/card/1".into(),
        }]);
        let options = RenderOptions {
            navigation_timeout: Duration::from_millis(100),
            selector_timeout: Duration::from_millis(50),
            settle: Duration::ZERO,
        };
        let browser = StubBrowser {
            html: FIXTURE_PAGE.to_string(),
        };
        CardLensServer::new(catalog, ScrapePipeline::new(Box::new(browser), options))
    }

    async fn roundtrip(server: &CardLensServer, line: &str) -> Value {
        let response = server.handle_line(line).await.expect("expected a response");
        serde_json::from_str(&response).unwrap()
    }

    /// Pull the tool payload back out of the content-block envelope.
    fn tool_payload(response: &Value) -> Value {
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let server = test_server();
        let response = roundtrip(
            &server,
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        )
        .await;
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["serverInfo"]["name"], "cardlens-mcp");
    }

    #[tokio::test]
    async fn test_initialized_notification_gets_no_response() {
        let server = test_server();
        let response = server
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
        assert!(server.handle_line("   ").await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let server = test_server();
        let response = roundtrip(&server, "{not json").await;
        assert_eq!(response["error"]["code"], -32700);
        assert_eq!(response["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = test_server();
        let response = roundtrip(
            &server,
            r#"{"jsonrpc":"2.0","id":2,"method":"does/not/exist"}"#,
        )
        .await;
        assert_eq!(response["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_tools_list_names_both_tools() {
        let server = test_server();
        let response = roundtrip(&server, r#"{"jsonrpc":"2.0","id":3,"method":"tools/list"}"#).await;
        let tools = response["result"]["tools"].as_array().unwrap();
        let names: Vec<&str> = tools
            .iter()
            .map(|tool| tool["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["GetAllCardListInfo", "CardBenefitInfo"]);
        assert_eq!(
            tools[1]["inputSchema"]["required"],
            serde_json::json!(["url"])
        );
    }

    #[tokio::test]
    async fn test_resources_read_returns_catalog() {
        let server = test_server();
        let response = roundtrip(
            &server,
            r#"{"jsonrpc":"2.0","id":4,"method":"resources/read","params":{"uri":"resource://card_list"}}"#,
        )
        .await;
        let text = response["result"]["contents"][0]["text"].as_str().unwrap();
        let cards: Vec<CardCatalogEntry> = serde_json::from_str(text).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Sample Card");
    }

    #[tokio::test]
    async fn test_get_all_card_list_info() {
        let server = test_server();
        let response = roundtrip(
            &server,
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"GetAllCardListInfo","arguments":{}}}"#,
        )
        .await;
        assert_eq!(response["result"]["isError"], false);
        let payload = tool_payload(&response);
        assert_eq!(payload["cards"][0]["url"], "https://example.test/card/1");
    }

    #[tokio::test]
    async fn test_card_benefit_info_rejects_unknown_url() {
        let server = test_server();
        let response = roundtrip(
            &server,
            r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"CardBenefitInfo","arguments":{"url":"https://evil.test/whatever"}}}"#,
        )
        .await;
        assert_eq!(response["result"]["isError"], true);
        let payload = tool_payload(&response);
        let message = payload["error"].as_str().unwrap();
        assert!(message.contains("not in the card catalog"));
        assert!(message.contains("https://evil.test/whatever"));
    }

    #[tokio::test]
    async fn test_card_benefit_info_scrapes_catalog_url() {
        let server = test_server();
        let response = roundtrip(
            &server,
            r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"CardBenefitInfo","arguments":{"url":"https://example.test/card/1"}}}"#,
        )
        .await;
        assert_eq!(response["result"]["isError"], false);
        let payload = tool_payload(&response);
        assert_eq!(payload["card_name"], "Sample Card");
        assert_eq!(payload["benefits"].as_array().unwrap().len(), 2);
        assert_eq!(payload["benefits"][1]["details"], "no detailed description");
        assert_eq!(payload["url"], "https://example.test/card/1");
    }

    #[tokio::test]
    async fn test_card_benefit_info_requires_url_argument() {
        let server = test_server();
        let response = roundtrip(
            &server,
            r#"{"jsonrpc":"2.0","id":8,"method":"tools/call","params":{"name":"CardBenefitInfo","arguments":{}}}"#,
        )
        .await;
        assert_eq!(response["error"]["code"], -32602);
    }
}
