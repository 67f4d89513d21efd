//! HTML page rendering.
//!
//! Pages are assembled with `format!` around a shared layout. Every string
//! that comes from the remote API or the query string goes through
//! [`html_escape`] before it is written into markup.

use crate::client::{ApodItem, MediaType, RoverPhoto};
use crate::dates::ARCHIVE_START;

/// Rovers offered in the rover selector.
pub const ROVERS: [&str; 4] = ["curiosity", "opportunity", "spirit", "perseverance"];

/// Camera codes offered in the camera selector.
pub const CAMERAS: [&str; 9] = [
    "fhaz", "rhaz", "mast", "chemcam", "mahli", "mardi", "navcam", "pancam", "minites",
];

// =============================================================================
// Notices
// =============================================================================

/// Severity of a page notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Info,
}

impl NoticeLevel {
    fn css_class(self) -> &'static str {
        match self {
            NoticeLevel::Error => "notice-error",
            NoticeLevel::Info => "notice-info",
        }
    }
}

/// A message shown above the page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

// =============================================================================
// View Models
// =============================================================================

/// Everything the APOD page shows.
#[derive(Debug, Default)]
pub struct ApodView {
    pub item: Option<ApodItem>,
    /// Value echoed back into the date field
    pub date_input: String,
    pub max_date: String,
    pub notices: Vec<Notice>,
}

/// Everything the rover page shows.
#[derive(Debug, Default)]
pub struct RoverView {
    pub photos: Vec<RoverPhoto>,
    pub rover: String,
    pub mode: String,
    pub camera: String,
    pub sol: String,
    pub earth_date: String,
    pub notices: Vec<Notice>,
}

/// Everything the gallery page shows.
#[derive(Debug, Default)]
pub struct GalleryView {
    pub items: Vec<ApodItem>,
    pub start_date: String,
    pub end_date: String,
    pub max_date: String,
    /// A complete range was requested from the API
    pub queried: bool,
    pub notices: Vec<Notice>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Escape HTML special characters to prevent XSS attacks.
pub fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Upper-case the first character ("spirit" -> "Spirit").
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Home,
    Apod,
    Rover,
    Gallery,
    None,
}

const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: #0b0d17; color: #e6e8f0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.5; }
a { color: #8ab4ff; }
header { display: flex; align-items: center; justify-content: space-between; padding: 12px 24px; background: #12152a; border-bottom: 1px solid #23284a; }
header .brand { font-weight: 700; color: #fff; text-decoration: none; }
nav a { margin-left: 16px; text-decoration: none; color: #b8bfdc; }
nav a.active { color: #fff; border-bottom: 2px solid #6c8cff; }
main { max-width: 1100px; margin: 24px auto; padding: 0 16px; }
h1 { font-size: 24px; margin-bottom: 16px; }
form { display: flex; flex-wrap: wrap; gap: 12px; align-items: flex-end; margin-bottom: 24px; }
label { display: flex; flex-direction: column; font-size: 12px; color: #b8bfdc; }
input, select, button { padding: 6px 10px; border-radius: 6px; border: 1px solid #2d3360; background: #151936; color: #fff; }
button { background: #3b5bdb; border-color: #3b5bdb; cursor: pointer; }
.notice { padding: 10px 14px; border-radius: 6px; margin-bottom: 12px; }
.notice-error { background: rgba(220, 38, 38, 0.2); border: 1px solid #dc2626; }
.notice-info { background: rgba(59, 130, 246, 0.2); border: 1px solid #3b82f6; }
.apod img, .apod iframe { width: 100%; max-height: 80vh; object-fit: contain; border: 0; border-radius: 8px; }
.apod iframe { aspect-ratio: 16 / 9; }
.apod .meta { color: #9aa3c7; font-size: 13px; margin: 8px 0; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr)); gap: 16px; }
.card { background: #12152a; border: 1px solid #23284a; border-radius: 8px; overflow: hidden; }
.card img { width: 100%; height: 180px; object-fit: cover; display: block; }
.card .body { padding: 10px 12px; font-size: 13px; }
.card .placeholder { display: block; padding: 24px 12px; text-align: center; background: #1b1f3b; }
.card .title { font-weight: 600; color: #fff; }
.empty { color: #9aa3c7; }
"#;

fn layout(title: &str, section: Section, notices: &[Notice], content: &str) -> String {
    let nav_link = |target: Section, href: &str, label: &str| {
        let class = if target == section { " class=\"active\"" } else { "" };
        format!("<a href=\"{}\"{}>{}</a>", href, class, label)
    };

    let nav = [
        nav_link(Section::Home, "/", "Home"),
        nav_link(Section::Apod, "/apod/", "APOD"),
        nav_link(Section::Rover, "/rover/", "Mars Rovers"),
        nav_link(Section::Gallery, "/gallery/", "Gallery"),
    ]
    .join("");

    let notices: String = notices
        .iter()
        .map(|n| {
            format!(
                "<div class=\"notice {}\" role=\"alert\">{}</div>\n",
                n.level.css_class(),
                html_escape(&n.message)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Astro Portal</title>
    <style>{STYLE}</style>
</head>
<body>
    <header>
        <a class="brand" href="/">Astro Portal</a>
        <nav>{nav}</nav>
    </header>
    <main>
{notices}{content}
    </main>
</body>
</html>
"#,
        title = html_escape(title),
    )
}

fn selected(current: &str, option: &str) -> &'static str {
    if current == option {
        " selected"
    } else {
        ""
    }
}

// =============================================================================
// Pages
// =============================================================================

/// Landing page.
pub fn home_page() -> String {
    let content = r#"<h1>Explore NASA imagery</h1>
<div class="grid">
    <div class="card"><div class="body">
        <div class="title"><a href="/apod/">Astronomy Picture of the Day</a></div>
        <p>Today's picture, or any day back to 1995-06-16.</p>
    </div></div>
    <div class="card"><div class="body">
        <div class="title"><a href="/rover/">Mars Rover Photos</a></div>
        <p>Latest images from Curiosity, Opportunity, Spirit and Perseverance, or browse by sol and Earth date.</p>
    </div></div>
    <div class="card"><div class="body">
        <div class="title"><a href="/gallery/">APOD Gallery</a></div>
        <p>Every picture between two dates, newest first.</p>
    </div></div>
</div>"#;

    layout("Home", Section::Home, &[], content)
}

/// Render a single APOD entry's media block.
fn apod_media(item: &ApodItem) -> String {
    let title = html_escape(&item.title);
    let url = html_escape(&item.url);

    match (item.media_type, item.display_image_url()) {
        (MediaType::Video, Some(thumb)) => format!(
            "<a href=\"{}\"><img src=\"{}\" alt=\"{}\"></a>",
            url,
            html_escape(thumb),
            title
        ),
        (MediaType::Video, None) => format!(
            "<iframe src=\"{}\" title=\"{}\" allowfullscreen></iframe>",
            url, title
        ),
        (MediaType::Image, Some(src)) => {
            let link = item.hdurl.as_deref().unwrap_or(&item.url);
            format!(
                "<a href=\"{}\"><img src=\"{}\" alt=\"{}\"></a>",
                html_escape(link),
                html_escape(src),
                title
            )
        }
        _ => format!("<p><a href=\"{}\">Open this entry</a></p>", url),
    }
}

/// APOD page.
pub fn apod_page(view: &ApodView) -> String {
    let form = format!(
        r#"<form method="get" action="/apod/">
    <label>Date <input type="date" name="date" value="{}" min="{}" max="{}"></label>
    <button type="submit">Show</button>
</form>"#,
        html_escape(&view.date_input),
        ARCHIVE_START,
        html_escape(&view.max_date),
    );

    let body = match &view.item {
        Some(item) => {
            let copyright = item
                .copyright
                .as_deref()
                .map(|c| format!(" &middot; &copy; {}", html_escape(c.trim())))
                .unwrap_or_default();
            format!(
                r#"<article class="apod">
    <h1>{}</h1>
    <div class="meta">{}{}</div>
    {}
    <p>{}</p>
</article>"#,
                html_escape(&item.title),
                html_escape(&item.date),
                copyright,
                apod_media(item),
                html_escape(&item.explanation),
            )
        }
        None => "<p class=\"empty\">No picture to show.</p>".to_string(),
    };

    layout(
        "Astronomy Picture of the Day",
        Section::Apod,
        &view.notices,
        &format!("{}\n{}", form, body),
    )
}

/// Rover photos page.
pub fn rover_page(view: &RoverView) -> String {
    let rover_options: String = ROVERS
        .iter()
        .map(|r| {
            format!(
                "<option value=\"{}\"{}>{}</option>",
                r,
                selected(&view.rover, r),
                capitalize(r)
            )
        })
        .collect();

    let mode_options: String = [
        ("latest", "Latest"),
        ("sol", "By sol"),
        ("earth_date", "By Earth date"),
    ]
    .iter()
    .map(|(value, label)| {
        format!(
            "<option value=\"{}\"{}>{}</option>",
            value,
            selected(&view.mode, value),
            label
        )
    })
    .collect();

    let camera_options: String = std::iter::once(format!(
        "<option value=\"\"{}>Any camera</option>",
        selected(&view.camera, "")
    ))
    .chain(CAMERAS.iter().map(|c| {
        format!(
            "<option value=\"{}\"{}>{}</option>",
            c,
            selected(&view.camera, c),
            c.to_uppercase()
        )
    }))
    .collect();

    let form = format!(
        r#"<form method="get" action="/rover/">
    <label>Rover <select name="rover">{}</select></label>
    <label>Mode <select name="mode">{}</select></label>
    <label>Sol <input type="number" name="sol" min="0" value="{}"></label>
    <label>Earth date <input type="date" name="earth_date" value="{}"></label>
    <label>Camera <select name="camera">{}</select></label>
    <button type="submit">Search</button>
</form>"#,
        rover_options,
        mode_options,
        html_escape(&view.sol),
        html_escape(&view.earth_date),
        camera_options,
    );

    let photos = if view.photos.is_empty() {
        "<p class=\"empty\">No photos found for this query.</p>".to_string()
    } else {
        let cards: String = view
            .photos
            .iter()
            .map(|p| {
                let camera = html_escape(p.camera.display_name());
                format!(
                    r#"<div class="card">
    <a href="{src}"><img src="{src}" alt="{camera}" loading="lazy"></a>
    <div class="body">
        <div class="title">{rover}</div>
        <div>{camera}</div>
        <div>Sol {sol} &middot; {earth_date}</div>
    </div>
</div>
"#,
                    src = html_escape(&p.img_src),
                    camera = camera,
                    rover = html_escape(&p.rover.name),
                    sol = p.sol,
                    earth_date = html_escape(&p.earth_date),
                )
            })
            .collect();
        format!("<div class=\"grid\">\n{}</div>", cards)
    };

    let content = format!(
        "<h1>{} photos</h1>\n{}\n{}",
        html_escape(&capitalize(&view.rover)),
        form,
        photos
    );

    layout("Mars Rover Photos", Section::Rover, &view.notices, &content)
}

/// APOD range gallery page.
pub fn gallery_page(view: &GalleryView) -> String {
    let form = format!(
        r#"<form method="get" action="/gallery/">
    <label>Start <input type="date" name="start_date" value="{}" min="{min}" max="{max}"></label>
    <label>End <input type="date" name="end_date" value="{}" min="{min}" max="{max}"></label>
    <button type="submit">Show range</button>
</form>"#,
        html_escape(&view.start_date),
        html_escape(&view.end_date),
        min = ARCHIVE_START,
        max = html_escape(&view.max_date),
    );

    let items = if !view.items.is_empty() {
        let cards: String = view
            .items
            .iter()
            .map(|item| {
                let media = match item.display_image_url() {
                    Some(src) => format!(
                        "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
                        html_escape(src),
                        html_escape(&item.title)
                    ),
                    None if item.is_video() => {
                        "<span class=\"placeholder\">Watch video</span>".to_string()
                    }
                    None => "<span class=\"placeholder\">View picture</span>".to_string(),
                };
                format!(
                    r#"<div class="card">
    <a href="/apod/?date={date_query}">{media}</a>
    <div class="body">
        <div class="title">{title}</div>
        <div>{date}</div>
    </div>
</div>
"#,
                    date_query = urlencoding::encode(&item.date),
                    media = media,
                    title = html_escape(&item.title),
                    date = html_escape(&item.date),
                )
            })
            .collect();
        format!("<div class=\"grid\">\n{}</div>", cards)
    } else if view.queried {
        "<p class=\"empty\">No pictures in this range.</p>".to_string()
    } else {
        "<p class=\"empty\">Pick a start and end date to browse the archive.</p>".to_string()
    };

    layout(
        "APOD Gallery",
        Section::Gallery,
        &view.notices,
        &format!("<h1>APOD Gallery</h1>\n{}\n{}", form, items),
    )
}

/// 404 page.
pub fn not_found_page(path: &str) -> String {
    let content = format!(
        "<h1>Page not found</h1>\n<p>Nothing lives at <code>{}</code>. <a href=\"/\">Back home</a>.</p>",
        html_escape(path)
    );
    layout("Not Found", Section::None, &[], &content)
}
