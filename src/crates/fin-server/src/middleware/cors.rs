//! CORS layer. This binary has no session/cookie auth of its own (the
//! HTTP transport layer is out of scope here), so a permissive layer is
//! the whole story.

use tower_http::cors::CorsLayer;

pub fn cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}
