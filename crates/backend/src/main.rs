pub mod handlers;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    use crate::shared::marketplaces::shopify::ShopifyClient;
    use crate::usecases::u508_bulk_product_create::ProductCreateExecutor;

    system::tracing::initialize()?;

    // Simple request logging middleware
    async fn request_logger(req: Request<Body>, next: Next) -> Response {
        let start = std::time::Instant::now();
        let method = req.method().clone();
        let uri = req.uri().clone();

        let response = next.run(req).await;

        // cyan for 200, brown for everything else
        let color_code = if response.status().as_u16() == 200 {
            "36"
        } else {
            "33"
        };
        println!(
            "\x1b[{}m{}\x1b[0m | {:>5}ms | {} {:>6} {}",
            color_code,
            chrono::Local::now().format("%H:%M:%S"),
            start.elapsed().as_millis(),
            response.status().as_u16(),
            method,
            uri.path()
        );
        response
    }

    let config = shared::config::load_config()?;
    tracing::info!(
        "Shop: {} (Admin API {})",
        config.shopify.shop_domain,
        config.shopify.api_version
    );

    let client = ShopifyClient::new(&config.shopify)?;
    let state = routes::AppState::new(ProductCreateExecutor::new(Arc::new(client)));
    let app = routes::configure_routes(state, config.server.max_body_bytes)
        .layer(middleware::from_fn(request_logger));

    let port = config.server.port;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
