//! HTML templating for the grid and detail pages.
//!
//! Everything here is a pure function of the data: no I/O, no state. Plain
//! text fields are escaped; `content` fields are author-written markup and
//! are emitted as-is.

use std::collections::HashMap;

use crate::constants::*;
use crate::model::{Catalog, Figure, Project, Section, TextBlock};

/// Intrinsic pixel sizes of local images, keyed by their `src`.
pub type ImageSizes = HashMap<String, (u32, u32)>;

/// Site-wide values that are not part of the data file.
#[derive(Debug, Clone)]
pub struct SiteInfo {
    pub owner_name: String,
    pub contact_email: Option<String>,
    /// Prefix for grid thumbnails of local images, e.g. `/thumbnail/`.
    pub thumbnail_route: Option<String>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            owner_name: DEFAULT_OWNER_NAME.to_string(),
            contact_email: None,
            thumbnail_route: None,
        }
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Whether `src` points into the site directory rather than at another host.
pub fn is_local(src: &str) -> bool {
    !src.contains("://") && !src.starts_with("//") && !src.starts_with("data:")
}

/// `value` encoded for use inside a query string.
pub fn query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn page(title: &str, body: &str, with_lightbox: bool) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("    <title>{}</title>\n", escape(title)));
    html.push_str("    <link rel=\"stylesheet\" href=\"/static/style.css\">\n");
    html.push_str("</head>\n<body>\n");
    html.push_str(body);
    if with_lightbox {
        html.push_str(&lightbox_overlay());
    }
    html.push_str(
        "<script type=\"module\">\n    import init from '/static/pkg/portfolio_site.js';\n    init().catch(err => console.error('Site script unavailable:', err));\n</script>\n",
    );
    html.push_str("</body>\n</html>\n");
    html
}

fn site_header(site: &SiteInfo) -> String {
    format!(
        "<header class=\"site-header\">\n    <a href=\"index.html\" class=\"site-name\">{}</a>\n    <nav><a href=\"index.html#work\">Work</a></nav>\n</header>\n",
        escape(&site.owner_name)
    )
}

/// Markup the browser host binds the lightbox to.
pub fn lightbox_overlay() -> String {
    format!(
        r#"<div class="{LIGHTBOX_CLASS}">
    <span class="lightbox-close">&times;</span>
    <div class="lightbox-image-container">
        <div class="lightbox-image-inner">
            <img src="" alt="Expanded view">
        </div>
    </div>
    <div class="lightbox-controls">
        <button class="lightbox-btn zoom-out">Zoom Out (&minus;)</button>
        <span class="lightbox-zoom-level">100%</span>
        <button class="lightbox-btn zoom-in">Zoom In (+)</button>
        <button class="lightbox-btn zoom-reset">Reset</button>
    </div>
</div>
"#
    )
}

// ---------------------------------------------------------------------------
// Grid page
// ---------------------------------------------------------------------------

pub fn grid_card(project: &Project, site: &SiteInfo) -> String {
    let image = match &project.thumbnail {
        Some(src) => {
            let src = match &site.thumbnail_route {
                Some(route) if is_local(src) => format!("{}{}", route, src.trim_start_matches('/')),
                _ => src.clone(),
            };
            format!("<img src=\"{}\" alt=\"{}\">", escape(&src), escape(&project.title))
        }
        None => String::new(),
    };
    let number = project
        .number
        .as_ref()
        .map(|n| escape(&n.to_string()))
        .unwrap_or_default();
    let tags: String = project
        .tags
        .iter()
        .map(|tag| format!("<span class=\"tag\">{}</span>", escape(tag)))
        .collect();

    format!(
        r#"<a href="project.html?id={id}" class="project-link">
    <div class="project">
        <div class="project-image">{image}</div>
        <div class="project-number">{number}</div>
        <h4 class="project-title">{title}</h4>
        <p class="project-description">{description}</p>
        <div class="project-tags">{tags}</div>
    </div>
</a>
"#,
        id = escape(&query_value(&project.id)),
        title = escape(&project.title),
        description = escape(&project.description),
    )
}

fn contact(site: &SiteInfo) -> String {
    match &site.contact_email {
        Some(email) => format!(
            "<section id=\"contact\" class=\"contact\">\n    <a id=\"{EMAIL_LINK_ID}\" href=\"mailto:{0}\" data-email=\"{0}\">{0}</a>\n</section>\n<div id=\"{TOAST_ELEMENT_ID}\" class=\"toast\">{TOAST_MESSAGE}</div>\n",
            escape(email)
        ),
        None => String::new(),
    }
}

fn grid_shell(grid: &str, site: &SiteInfo) -> String {
    let mut body = site_header(site);
    body.push_str("<main>\n<section id=\"work\" class=\"work\">\n");
    body.push_str(&format!(
        "<div id=\"{GRID_ELEMENT_ID}\" class=\"projects-grid\">\n{grid}</div>\n"
    ));
    body.push_str("</section>\n");
    body.push_str(&contact(site));
    body.push_str("</main>\n");
    page(&site.owner_name, &body, false)
}

pub fn grid_page(catalog: &Catalog, site: &SiteInfo) -> String {
    let cards: String = catalog
        .projects
        .iter()
        .map(|project| grid_card(project, site))
        .collect();
    grid_shell(&cards, site)
}

/// Landing page whose grid holds only a message, for when the data failed to load.
pub fn grid_error_page(message: &str, site: &SiteInfo) -> String {
    grid_shell(&format!("<p>{}</p>\n", escape(message)), site)
}

// ---------------------------------------------------------------------------
// Detail page
// ---------------------------------------------------------------------------

fn hero(project: &Project) -> String {
    let background = project
        .thumbnail
        .as_ref()
        .map(|src| format!(" style=\"background-image: url('{}');\"", escape(src)))
        .unwrap_or_default();
    let tech_tags: String = project
        .tech_tags
        .iter()
        .map(|tag| format!("<span class=\"tech-tag\">{}</span>", escape(tag)))
        .collect();

    format!(
        r#"<section class="project-hero"{background}>
    <div class="project-hero-content">
        <div class="project-meta">
            <span class="meta-item">{role}</span>
            <span class="meta-item">{timeline}</span>
            <span class="meta-item">{team_size}</span>
        </div>
        <h2>{title}</h2>
        <p class="project-subtitle">{subtitle}</p>
        <div class="project-tech-tags">{tech_tags}</div>
    </div>
</section>
"#,
        role = escape(&project.meta.role),
        timeline = escape(&project.meta.timeline),
        team_size = escape(&project.meta.team_size),
        title = escape(&project.title),
        subtitle = escape(&project.subtitle),
    )
}

fn text_block(block: &TextBlock) -> String {
    format!(
        "<section class=\"project-content\">\n    <h3 class=\"content-heading\">{}</h3>\n    <p>{}</p>\n</section>\n",
        escape(&block.heading),
        block.content
    )
}

fn gallery_figure(image: &Figure, sizes: &ImageSizes) -> String {
    let dimensions = sizes
        .get(&image.src)
        .map(|(w, h)| format!(" width=\"{}\" height=\"{}\"", w, h))
        .unwrap_or_default();
    format!(
        "    <figure class=\"gallery-image\">\n        <img src=\"{}\" alt=\"{}\"{}>\n        <figcaption>{}</figcaption>\n    </figure>\n",
        escape(&image.src),
        escape(&image.alt),
        dimensions,
        escape(&image.caption)
    )
}

/// Renders one section. Unknown sections render nothing.
pub fn section(section: &Section, sizes: &ImageSizes) -> String {
    match section {
        Section::Overview(block) | Section::Problem(block) | Section::Learnings(block) => {
            text_block(block)
        }
        Section::Technical { heading, content, subsections } => {
            let mut html = format!(
                "<section class=\"project-content\">\n    <h3 class=\"content-heading\">{}</h3>\n    <p>{}</p>\n",
                escape(heading),
                content
            );
            for sub in subsections {
                html.push_str(&format!(
                    "    <h4 class=\"subsection-heading\">{}</h4>\n    <p>{}</p>\n",
                    escape(&sub.heading),
                    sub.content
                ));
            }
            html.push_str("</section>\n");
            html
        }
        Section::Gallery { layout, images } => {
            let mut html = format!(
                "<section class=\"image-gallery\">\n<div class=\"gallery-{}\">\n",
                escape(layout)
            );
            for image in images {
                html.push_str(&gallery_figure(image, sizes));
            }
            html.push_str("</div>\n</section>\n");
            html
        }
        Section::Results { heading, content, metrics } => {
            let mut html = format!(
                "<section class=\"project-content\">\n    <h3 class=\"content-heading\">{}</h3>\n    <p>{}</p>\n",
                escape(heading),
                content
            );
            if !metrics.is_empty() {
                html.push_str("    <div class=\"results-grid\">\n");
                for metric in metrics {
                    html.push_str(&format!(
                        "        <div class=\"result-item\">\n            <div class=\"result-number\">{}</div>\n            <div class=\"result-label\">{}</div>\n        </div>\n",
                        escape(&metric.value),
                        escape(&metric.label)
                    ));
                }
                html.push_str("    </div>\n");
            }
            html.push_str("</section>\n");
            html
        }
        Section::FullWidthImage(figure) => format!(
            "<section class=\"full-width-image\">\n    <figure>\n        <img src=\"{}\" alt=\"{}\">\n        <figcaption>{}</figcaption>\n    </figure>\n</section>\n",
            escape(&figure.src),
            escape(&figure.alt),
            escape(&figure.caption)
        ),
        Section::Video { src, format, caption } => {
            let caption = caption
                .as_ref()
                .filter(|c| !c.is_empty())
                .map(|c| format!("    <figcaption class=\"video-caption\">{}</figcaption>\n", escape(c)))
                .unwrap_or_default();
            format!(
                "<section class=\"project-content\">\n    <div class=\"video-container\">\n        <video controls playsinline muted loop>\n            <source src=\"{}\" type=\"video/{}\">\n        </video>\n    </div>\n{}</section>\n",
                escape(src),
                escape(format),
                caption
            )
        }
        Section::Unknown => String::new(),
    }
}

fn nav_link(project: &Project, class: &str, label: &str) -> String {
    format!(
        "<a href=\"project.html?id={}\" class=\"nav-project {}\">\n    <span class=\"nav-label\">{}</span>\n    <span class=\"nav-title\">{}</span>\n</a>\n",
        escape(&query_value(&project.id)),
        class,
        label,
        escape(&project.title)
    )
}

/// Previous / back / next links; empty cells keep the three-column layout.
pub fn navigation(project: &Project, catalog: &Catalog) -> String {
    let (prev, next) = catalog.neighbours(&project.id);
    let mut html = String::from("<section class=\"project-navigation\">\n");
    match prev {
        Some(p) => html.push_str(&nav_link(p, "prev-project", "Previous Project")),
        None => html.push_str("<div></div>\n"),
    }
    html.push_str(
        "<a href=\"index.html#work\" class=\"nav-project back-home\">\n    <span class=\"nav-label\">Back to</span>\n    <span class=\"nav-title\">All Projects</span>\n</a>\n",
    );
    match next {
        Some(p) => html.push_str(&nav_link(p, "next-project", "Next Project")),
        None => html.push_str("<div></div>\n"),
    }
    html.push_str("</section>\n");
    html
}

/// Inner content of the detail page (what goes inside `#project-content`).
pub fn project_content(project: &Project, catalog: &Catalog, sizes: &ImageSizes) -> String {
    let mut html = hero(project);
    match project.content_sections() {
        Some(sections) => {
            for s in sections {
                html.push_str(&section(s, sizes));
            }
        }
        None => html.push_str(&text_block(&TextBlock {
            heading: "Overview".to_string(),
            content: project.description.clone(),
        })),
    }
    html.push_str(&navigation(project, catalog));
    html
}

fn detail_shell(title: &str, content: &str, site: &SiteInfo, with_lightbox: bool) -> String {
    let mut body = site_header(site);
    body.push_str(&format!(
        "<main id=\"{CONTENT_ELEMENT_ID}\" class=\"project-detail\">\n{content}</main>\n"
    ));
    page(title, &body, with_lightbox)
}

pub fn project_page(project: &Project, catalog: &Catalog, sizes: &ImageSizes, site: &SiteInfo) -> String {
    let title = format!("{} - {}", project.title, site.owner_name);
    detail_shell(&title, &project_content(project, catalog, sizes), site, true)
}

/// Detail page holding only a static message ("Project not found." etc.).
pub fn message_page(message: &str, site: &SiteInfo) -> String {
    detail_shell(&site.owner_name, &format!("<p>{}</p>\n", escape(message)), site, false)
}
