//! HTTP server layer for Astro Portal.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │            GET /apod/   GET /rover/   GET /gallery/             │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌────────┐  │
//! │  │  handlers   │  │    pages    │  │   session   │  │ routes │  │
//! │  │ (requests)  │  │   (HTML)    │  │  (cookies)  │  │        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────┘  └────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod pages;
pub mod routes;
pub mod session;

pub use handlers::{
    apod_handler, gallery_handler, health_handler, home_handler, not_found_handler,
    rover_handler, sort_newest_first, ApodQueryParams, AppState, GalleryQueryParams,
    HealthResponse, QueryArgs, RoverQuery, RoverQueryParams,
};
pub use pages::{Notice, NoticeLevel, CAMERAS, ROVERS};
pub use routes::{create_router, RouterConfig};
pub use session::{SessionSigner, ROVER_COOKIE};
