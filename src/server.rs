//! HTTP transport for the GraphQL schema.

use std::net::SocketAddr;

use anyhow::Result;
use async_graphql::http::{GraphiQLSource, parse_query_string};
use async_graphql::parser::parse_query;
use async_graphql::parser::types::OperationType;
use axum::Router;
use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::schema::ProjectSchema;

pub const GRAPHQL_PATH: &str = "/graphql";

const MISSING_QUERY: &str = "Must provide query string.";
const MUTATION_OVER_GET: &str = "Can only perform a mutation operation from a POST request.";

/// Build the router serving `schema` at `/graphql`.
///
/// Queries are accepted as a POST body or a GET query string. A bare
/// `GET /graphql` serves the GraphiQL explorer when `graphiql` is set.
pub fn router(schema: ProjectSchema, graphiql: bool) -> Router {
    let endpoint = if graphiql {
        get(graphiql_or_query)
    } else {
        get(graphql_get_handler)
    };

    Router::new()
        .route(GRAPHQL_PATH, endpoint.post(graphql_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(schema)
}

async fn graphql_handler(
    State(schema): State<ProjectSchema>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(schema.execute(request).await)
}

async fn graphql_get_handler(
    State(schema): State<ProjectSchema>,
    RawQuery(query): RawQuery,
) -> Response {
    let Some(query) = query else {
        return (StatusCode::BAD_REQUEST, MISSING_QUERY).into_response();
    };
    let request = match parse_query_string(&query) {
        Ok(request) => request,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    };

    if is_mutation(&request.query) {
        return (StatusCode::METHOD_NOT_ALLOWED, MUTATION_OVER_GET).into_response();
    }

    Json(schema.execute(request).await).into_response()
}

async fn graphiql_or_query(
    State(schema): State<ProjectSchema>,
    RawQuery(query): RawQuery,
) -> Response {
    match query {
        Some(query) => graphql_get_handler(State(schema), RawQuery(Some(query))).await,
        None => graphiql_page().await.into_response(),
    }
}

async fn graphiql_page() -> Html<String> {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

// Unparsable documents are left for the executor to report.
fn is_mutation(query: &str) -> bool {
    parse_query(query).is_ok_and(|doc| {
        doc.operations
            .iter()
            .any(|(_, op)| op.node.ty == OperationType::Mutation)
    })
}

/// Serve the schema on `port` until Ctrl-C
pub async fn serve(schema: ProjectSchema, port: u16, graphiql: bool) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, graphiql, "server is running");

    axum::serve(listener, router(schema, graphiql))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::db::MemoryStore;
    use crate::schema::build_schema;

    fn app(graphiql: bool) -> Router {
        router(build_schema(Arc::new(MemoryStore::new())), graphiql)
    }

    fn graphql_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(GRAPHQL_PATH)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_post_executes_mutation_and_query() {
        let app = app(false);

        let response = app
            .clone()
            .oneshot(graphql_request(json!({
                "query": "mutation ($n: String!) { addClient(name: $n, email: \"a@acme.com\", phone: \"555-1234\") { name } }",
                "variables": { "n": "Acme" },
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["data"]["addClient"]["name"], "Acme");

        let response = app
            .oneshot(graphql_request(json!({ "query": "{ clients { name } }" })))
            .await
            .unwrap();
        assert_eq!(
            json_body(response).await["data"],
            json!({ "clients": [{ "name": "Acme" }] })
        );
    }

    #[tokio::test]
    async fn test_validation_errors_are_returned_to_caller() {
        let response = app(false)
            .oneshot(graphql_request(json!({ "query": "mutation { deleteProject { id } }" })))
            .await
            .unwrap();

        let body = json_body(response).await;
        let message = body["errors"][0]["message"].as_str().unwrap();
        assert!(message.contains("id"));
    }

    #[tokio::test]
    async fn test_graphiql_served_in_development() {
        let response = app(true)
            .oneshot(Request::get(GRAPHQL_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.to_lowercase().contains("graphiql"));
    }

    #[tokio::test]
    async fn test_graphiql_hidden_outside_development() {
        let response = app(false)
            .oneshot(Request::get(GRAPHQL_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_executes_query_string() {
        for graphiql in [false, true] {
            let response = app(graphiql)
                .oneshot(
                    Request::get(format!("{GRAPHQL_PATH}?query=%7Bclients%7Bid%7D%7D"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(json_body(response).await["data"], json!({ "clients": [] }));
        }
    }

    #[tokio::test]
    async fn test_get_refuses_mutations() {
        let query = "mutation%7BdeleteProject(id:%22x%22)%7Bid%7D%7D";
        let response = app(false)
            .oneshot(
                Request::get(format!("{GRAPHQL_PATH}?query={query}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
