//! Page handler tests.
//!
//! Tests verify:
//! - Query validation happens before any remote call
//! - The exact arguments handed to the API client
//! - Generic failure notices that never leak the underlying error
//! - Rendering details (video thumbnails, sort order, 404s)

use axum::http::{header, StatusCode};
use chrono::{Duration, Local};

use astro_portal::server::{ROVERS, ROVER_COOKIE};
use astro_portal::SessionSigner;

use super::test_utils::{
    get, get_with_cookie, image_item, rover_photo, test_router, video_item, Call, MockSpaceApi,
    TEST_SECRET,
};

const RAW_ERROR: &str = "403 Client Error: Forbidden for url with api_key=SECRET";

// =============================================================================
// Home, Health and Not Found
// =============================================================================

#[tokio::test]
async fn test_home_ok() {
    let router = test_router(MockSpaceApi::new());
    let response = get(&router, "/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Astro Portal"));
    assert!(response.body.contains("/apod/"));
}

#[tokio::test]
async fn test_health() {
    let router = test_router(MockSpaceApi::new());
    let response = get(&router, "/health").await;

    assert_eq!(response.status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let api = MockSpaceApi::new();
    let router = test_router(api.clone());
    let response = get(&router, "/definitely-not-a-route").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("Page not found"));
    assert!(api.calls().is_empty());
}

// =============================================================================
// APOD
// =============================================================================

#[tokio::test]
async fn test_apod_today_ok() {
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    let api = MockSpaceApi::new().with_apod(image_item(
        &today,
        "Test APOD Today",
        "https://example.com/test_today.jpg",
    ));
    let router = test_router(api.clone());

    let response = get(&router, "/apod/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Test APOD Today"));
    assert!(response.body.contains("https://example.com/test_today.jpg"));
    assert_eq!(
        api.calls(),
        vec![Call::Apod {
            date: None,
            thumbs: true
        }]
    );
}

#[tokio::test]
async fn test_apod_without_trailing_slash() {
    let api = MockSpaceApi::new().with_apod(image_item("2024-01-01", "No Slash", "u"));
    let router = test_router(api);

    let response = get(&router, "/apod").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("No Slash"));
}

#[tokio::test]
async fn test_apod_specific_date_ok() {
    let api = MockSpaceApi::new().with_apod(image_item(
        "2024-01-01",
        "Test APOD 2024-01-01",
        "https://example.com/test_2024.jpg",
    ));
    let router = test_router(api.clone());

    let response = get(&router, "/apod/?date=2024-01-01").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Test APOD 2024-01-01"));
    assert_eq!(
        api.calls(),
        vec![Call::Apod {
            date: Some("2024-01-01".to_string()),
            thumbs: true
        }]
    );
}

#[tokio::test]
async fn test_apod_invalid_dates_never_reach_client() {
    let tomorrow = (Local::now().date_naive() + Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();

    for bad in ["1990-01-01", "1995-06-15", "not-a-date", "2024-13-01", tomorrow.as_str()] {
        let api = MockSpaceApi::new();
        let router = test_router(api.clone());

        let response = get(&router, &format!("/apod/?date={}", bad)).await;

        assert_eq!(response.status, StatusCode::OK, "date {}", bad);
        assert!(response.body.contains("Invalid APOD date"), "date {}", bad);
        // The page falls back to the most recent entry without the bad date.
        assert_eq!(
            api.calls(),
            vec![Call::Apod {
                date: None,
                thumbs: true
            }],
            "date {}",
            bad
        );
    }
}

#[tokio::test]
async fn test_apod_repeated_date_uses_first_value() {
    let api = MockSpaceApi::new();
    let router = test_router(api.clone());

    let response = get(&router, "/apod/?date=2024-01-01&date=2024-01-02").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<html"));
    assert_eq!(
        api.calls(),
        vec![Call::Apod {
            date: Some("2024-01-01".to_string()),
            thumbs: true
        }]
    );
}

#[tokio::test]
async fn test_apod_archive_start_accepted() {
    let api = MockSpaceApi::new();
    let router = test_router(api.clone());

    let response = get(&router, "/apod/?date=1995-06-16").await;

    assert!(!response.body.contains("Invalid APOD date"));
    assert_eq!(
        api.calls(),
        vec![Call::Apod {
            date: Some("1995-06-16".to_string()),
            thumbs: true
        }]
    );
}

#[tokio::test]
async fn test_apod_empty_date_is_absent() {
    let api = MockSpaceApi::new();
    let router = test_router(api.clone());

    let response = get(&router, "/apod/?date=").await;

    assert!(!response.body.contains("Invalid APOD date"));
    assert_eq!(
        api.calls(),
        vec![Call::Apod {
            date: None,
            thumbs: true
        }]
    );
}

#[tokio::test]
async fn test_apod_video_renders_thumbnail() {
    let api = MockSpaceApi::new().with_apod(video_item(
        "2024-01-02",
        "Video Day",
        "https://video.example.com/embed",
        "https://example.com/thumb.jpg",
    ));
    let router = test_router(api);

    let response = get(&router, "/apod/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Video Day"));
    assert!(response
        .body
        .contains("<img src=\"https://example.com/thumb.jpg\""));
    assert!(!response
        .body
        .contains("<img src=\"https://video.example.com/embed\""));
}

#[tokio::test]
async fn test_apod_error_shows_generic_notice() {
    let api = MockSpaceApi::new().failing(RAW_ERROR);
    let router = test_router(api);

    let response = get(&router, "/apod/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Failed to load APOD"));
    assert!(!response.body.contains(RAW_ERROR));
    assert!(!response.body.contains("SECRET"));
}

#[tokio::test]
async fn test_apod_escapes_remote_text() {
    let mut item = image_item("2024-01-01", "<script>alert(1)</script>", "u");
    item.explanation = "a & b".to_string();
    let router = test_router(MockSpaceApi::new().with_apod(item));

    let response = get(&router, "/apod/").await;

    assert!(!response.body.contains("<script>alert(1)</script>"));
    assert!(response.body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(response.body.contains("a &amp; b"));
}

// =============================================================================
// Mars Rover Photos
// =============================================================================

#[tokio::test]
async fn test_rover_latest_for_each_rover() {
    for rover in ROVERS {
        let title = format!("{}{}", rover[..1].to_uppercase(), &rover[1..]);
        let api = MockSpaceApi::new().with_photos(vec![rover_photo(
            &title,
            "Navcam",
            100,
            "2021-06-01",
        )]);
        let router = test_router(api.clone());

        let response = get(&router, &format!("/rover/?mode=latest&rover={}", rover)).await;

        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains(&title));
        assert!(response.body.contains("Navcam"));
        assert_eq!(
            api.calls(),
            vec![Call::Latest {
                rover: rover.to_string()
            }]
        );
    }
}

#[tokio::test]
async fn test_rover_by_sol_with_camera() {
    let api = MockSpaceApi::new().with_photos(vec![rover_photo(
        "Curiosity",
        "Mast Camera",
        100,
        "2021-06-01",
    )]);
    let router = test_router(api.clone());

    let response = get(&router, "/rover/?mode=sol&rover=curiosity&sol=100&camera=mast").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Mast Camera"));
    assert_eq!(
        api.calls(),
        vec![Call::BySol {
            rover: "curiosity".to_string(),
            sol: 100,
            camera: Some("mast".to_string())
        }]
    );
}

#[tokio::test]
async fn test_rover_repeated_sol_uses_first_value() {
    let api = MockSpaceApi::new();
    let router = test_router(api.clone());

    let response = get(&router, "/rover/?sol=1&sol=2&mode=sol").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<html"));
    assert_eq!(
        api.calls(),
        vec![Call::BySol {
            rover: "curiosity".to_string(),
            sol: 1,
            camera: None
        }]
    );
}

#[tokio::test]
async fn test_rover_by_earth_date_with_camera() {
    let api = MockSpaceApi::new().with_photos(vec![rover_photo(
        "Curiosity",
        "RHAZ",
        101,
        "2021-06-01",
    )]);
    let router = test_router(api.clone());

    let response = get(
        &router,
        "/rover/?mode=earth_date&rover=curiosity&earth_date=2021-06-01&camera=rhaz",
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("RHAZ"));
    assert_eq!(
        api.calls(),
        vec![Call::ByEarthDate {
            rover: "curiosity".to_string(),
            earth_date: "2021-06-01".to_string(),
            camera: Some("rhaz".to_string())
        }]
    );
}

#[tokio::test]
async fn test_rover_defaults_to_latest_curiosity() {
    let api = MockSpaceApi::new();
    let router = test_router(api.clone());

    let response = get(&router, "/rover/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("No photos found"));
    assert_eq!(
        api.calls(),
        vec![Call::Latest {
            rover: "curiosity".to_string()
        }]
    );
}

#[tokio::test]
async fn test_rover_unknown_or_incomplete_mode_falls_back_to_latest() {
    for uri in [
        "/rover/?mode=panorama&rover=spirit&sol=5",
        "/rover/?mode=sol&rover=spirit",
        "/rover/?mode=sol&rover=spirit&sol=abc",
        "/rover/?mode=earth_date&rover=spirit",
    ] {
        let api = MockSpaceApi::new();
        let router = test_router(api.clone());

        let response = get(&router, uri).await;

        assert_eq!(response.status, StatusCode::OK, "{}", uri);
        assert_eq!(
            api.calls(),
            vec![Call::Latest {
                rover: "spirit".to_string()
            }],
            "{}",
            uri
        );
    }
}

#[tokio::test]
async fn test_rover_name_is_lowercased() {
    let api = MockSpaceApi::new();
    let router = test_router(api.clone());

    get(&router, "/rover/?rover=Opportunity").await;

    assert_eq!(
        api.calls(),
        vec![Call::Latest {
            rover: "opportunity".to_string()
        }]
    );
}

#[tokio::test]
async fn test_rover_error_shows_generic_notice() {
    let api = MockSpaceApi::new().failing(RAW_ERROR);
    let router = test_router(api);

    let response = get(&router, "/rover/?mode=latest&rover=curiosity").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Failed to load Mars photos"));
    assert!(!response.body.contains(RAW_ERROR));
}

#[tokio::test]
async fn test_rover_sets_signed_preference_cookie() {
    let router = test_router(MockSpaceApi::new());

    let response = get(&router, "/rover/?rover=spirit").await;

    let cookie = response
        .headers
        .get(header::SET_COOKIE)
        .expect("rover page should set a cookie")
        .to_str()
        .unwrap();
    let token = SessionSigner::new(TEST_SECRET).sign(ROVER_COOKIE, "spirit");
    assert!(cookie.starts_with(&format!("{}={}", ROVER_COOKIE, token)));
}

#[tokio::test]
async fn test_rover_unknown_rover_not_remembered() {
    let router = test_router(MockSpaceApi::new());

    let response = get(&router, "/rover/?rover=sojourner").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_rover_remembers_last_rover() {
    let api = MockSpaceApi::new();
    let router = test_router(api.clone());
    let token = SessionSigner::new(TEST_SECRET).sign(ROVER_COOKIE, "perseverance");

    get_with_cookie(&router, "/rover/", &format!("{}={}", ROVER_COOKIE, token)).await;
    // An explicit parameter wins over the cookie.
    get_with_cookie(
        &router,
        "/rover/?rover=spirit",
        &format!("{}={}", ROVER_COOKIE, token),
    )
    .await;

    assert_eq!(
        api.calls(),
        vec![
            Call::Latest {
                rover: "perseverance".to_string()
            },
            Call::Latest {
                rover: "spirit".to_string()
            }
        ]
    );
}

#[tokio::test]
async fn test_rover_ignores_forged_cookie() {
    let api = MockSpaceApi::new();
    let router = test_router(api.clone());
    let forged = SessionSigner::new("someone-else").sign(ROVER_COOKIE, "spirit");

    get_with_cookie(&router, "/rover/", &format!("{}={}", ROVER_COOKIE, forged)).await;

    assert_eq!(
        api.calls(),
        vec![Call::Latest {
            rover: "curiosity".to_string()
        }]
    );
}

// =============================================================================
// APOD Gallery
// =============================================================================

#[tokio::test]
async fn test_gallery_range_ok() {
    let api = MockSpaceApi::new().with_range(vec![
        image_item("2024-01-01", "Range Start", "https://example.com/start.jpg"),
        video_item(
            "2024-01-02",
            "Range End",
            "https://example.com/video",
            "https://example.com/end_thumb.jpg",
        ),
    ]);
    let router = test_router(api.clone());

    let response = get(&router, "/gallery/?start_date=2024-01-01&end_date=2024-01-02").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Range Start"));
    assert!(response.body.contains("Range End"));
    assert!(response.body.contains("end_thumb.jpg"));
    assert_eq!(
        api.calls(),
        vec![Call::ApodRange {
            start: "2024-01-01".to_string(),
            end: "2024-01-02".to_string(),
            thumbs: true
        }]
    );
}

#[tokio::test]
async fn test_gallery_sorted_newest_first() {
    let api = MockSpaceApi::new().with_range(vec![
        image_item("2024-01-01", "First Day", "a"),
        image_item("2024-01-03", "Third Day", "c"),
        image_item("2024-01-02", "Second Day", "b"),
    ]);
    let router = test_router(api);

    let body = get(&router, "/gallery/?start_date=2024-01-01&end_date=2024-01-03")
        .await
        .body;

    let third = body.find("Third Day").unwrap();
    let second = body.find("Second Day").unwrap();
    let first = body.find("First Day").unwrap();
    assert!(third < second && second < first);
}

#[tokio::test]
async fn test_gallery_swaps_inverted_range_and_calls_once() {
    let api = MockSpaceApi::new();
    let router = test_router(api.clone());

    let response = get(&router, "/gallery/?start_date=2024-01-05&end_date=2024-01-01").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Dates swapped to form a valid range"));
    assert_eq!(
        api.calls(),
        vec![Call::ApodRange {
            start: "2024-01-01".to_string(),
            end: "2024-01-05".to_string(),
            thumbs: true
        }]
    );
    // The form shows the normalized bounds.
    assert!(response.body.contains("name=\"start_date\" value=\"2024-01-01\""));
    assert!(response.body.contains("name=\"end_date\" value=\"2024-01-05\""));
}

#[tokio::test]
async fn test_gallery_repeated_start_date_uses_first_value() {
    let api = MockSpaceApi::new();
    let router = test_router(api.clone());

    let response = get(
        &router,
        "/gallery/?start_date=2024-01-01&start_date=bogus&end_date=2024-01-03",
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.body.contains("Invalid start_date"));
    assert_eq!(
        api.calls(),
        vec![Call::ApodRange {
            start: "2024-01-01".to_string(),
            end: "2024-01-03".to_string(),
            thumbs: true
        }]
    );
}

#[tokio::test]
async fn test_gallery_invalid_start_rejected() {
    let api = MockSpaceApi::new();
    let router = test_router(api.clone());

    let response = get(&router, "/gallery/?start_date=1990-01-01&end_date=1990-01-02").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Invalid start_date"));
    assert!(response.body.contains("Invalid end_date"));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_gallery_unparseable_end_rejected() {
    let api = MockSpaceApi::new();
    let router = test_router(api.clone());

    let response = get(&router, "/gallery/?start_date=2024-01-01&end_date=soon").await;

    assert!(response.body.contains("Invalid end_date"));
    assert!(!response.body.contains("Invalid start_date"));
    assert!(api.calls().is_empty());
    // The rejected value is echoed back for correction.
    assert!(response.body.contains("name=\"end_date\" value=\"soon\""));
}

#[tokio::test]
async fn test_gallery_requires_both_bounds() {
    for uri in [
        "/gallery/",
        "/gallery/?start_date=2024-01-01",
        "/gallery/?end_date=2024-01-01",
        "/gallery/?start_date=&end_date=2024-01-01",
    ] {
        let api = MockSpaceApi::new();
        let router = test_router(api.clone());

        let response = get(&router, uri).await;

        assert_eq!(response.status, StatusCode::OK, "{}", uri);
        assert!(api.calls().is_empty(), "{}", uri);
        assert!(!response.body.contains("Invalid"), "{}", uri);
    }
}

#[tokio::test]
async fn test_gallery_error_shows_generic_notice() {
    let api = MockSpaceApi::new().failing(RAW_ERROR);
    let router = test_router(api.clone());

    let response = get(&router, "/gallery/?start_date=2024-01-01&end_date=2024-01-02").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Failed to load APOD gallery"));
    assert!(!response.body.contains(RAW_ERROR));
    assert_eq!(api.calls().len(), 1);
}
