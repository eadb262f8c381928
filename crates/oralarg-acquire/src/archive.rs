use crate::http;
use crate::normalize::normalize_cell_text;
use anyhow::{Context, Result};
use oralarg_model::{CaseEntry, Year};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Public archive page that embeds the video listing frame.
pub const ARCHIVE_URL: &str = "https://www.azcourts.gov/AZ-Supreme-Court/Live-Archived-Video";

/// Matches the `src` of the embedded Granicus publisher holding the listings.
const LISTING_FRAME_PATTERN: &str = r"granicus\.com/ViewPublisher\.php\?view_id=11";

const ONCLICK_PATTERN: &str = r"window\.open\('([^']+)'";

/// Minimum cells in a listing row; the video link lives in the fifth.
const MIN_ROW_CELLS: usize = 5;
const NAME_CELL: usize = 0;
const VIDEO_CELL: usize = 4;

/// The cases for one year, plus where they were scraped from.
#[derive(Debug, Clone)]
pub struct YearListing {
    pub listing_url: String,
    /// Inner HTML of the selected year's panel.
    pub panel_html: String,
    pub cases: Vec<CaseEntry>,
}

/// Fetch and parse the case listing for `year`.
///
/// Loads the archive page, follows its listing frame (or goes straight to
/// `listing_url` when given), selects the year's tab panel, and extracts the
/// case rows.
pub async fn fetch_year_listing(
    client: &reqwest::Client,
    year: Year,
    listing_url: Option<&str>,
) -> Result<YearListing> {
    fetch_listing_from(client, ARCHIVE_URL, year, listing_url).await
}

async fn fetch_listing_from(
    client: &reqwest::Client,
    archive_url: &str,
    year: Year,
    listing_url: Option<&str>,
) -> Result<YearListing> {
    let frame_url = match listing_url {
        Some(url) => Url::parse(url).with_context(|| format!("Invalid listing URL: {url}"))?,
        None => {
            tracing::info!(url = archive_url, "Fetching archive page");
            let html = http::fetch_page(client, archive_url).await?;
            tracing::debug!(bytes = html.len(), "Received archive page");
            locate_listing_frame(&html, archive_url)?
        }
    };

    tracing::info!(url = %frame_url, "Fetching listing frame");
    let frame_html = http::fetch_page(client, frame_url.as_str()).await?;
    tracing::debug!(bytes = frame_html.len(), "Received listing frame");

    let panel_html = select_year_panel(&frame_html, year)?;
    let cases = extract_cases(&panel_html, &frame_url);
    tracing::info!(year = %year, cases = cases.len(), "Parsed case listing");

    Ok(YearListing {
        listing_url: frame_url.to_string(),
        panel_html,
        cases,
    })
}

/// Find the listing iframe on the archive page and resolve its URL.
pub fn locate_listing_frame(html: &str, page_url: &str) -> Result<Url> {
    let document = Html::parse_document(html);
    let iframe_sel = Selector::parse("iframe[src]").expect("valid selector");
    let pattern = Regex::new(LISTING_FRAME_PATTERN).expect("valid regex");

    let src = document
        .select(&iframe_sel)
        .filter_map(|el| el.value().attr("src"))
        .find(|src| pattern.is_match(src))
        .context("Could not find iframe containing case listings.")?;

    let base = Url::parse(page_url).with_context(|| format!("Invalid page URL: {page_url}"))?;
    base.join(src.trim())
        .with_context(|| format!("Invalid listing frame URL: {src}"))
}

/// Select the content panel for `year` from the listing frame's tab widget.
///
/// Tabs and panels are siblings in document order, so the panel belonging to
/// the tab labelled `year` is the one at the same position. Returns the
/// panel's inner HTML.
pub fn select_year_panel(html: &str, year: Year) -> Result<String> {
    let document = Html::parse_document(html);
    let tab_sel = Selector::parse("ul.TabbedPanelsTabGroup li.TabbedPanelsTab").expect("valid selector");
    let grouped_panel_sel =
        Selector::parse("div.TabbedPanelsContentGroup > div.TabbedPanelsContent").expect("valid selector");
    let panel_sel = Selector::parse("div.TabbedPanelsContent").expect("valid selector");
    let visible_sel = Selector::parse("div.TabbedPanelsContentVisible").expect("valid selector");

    let tabs: Vec<String> = document
        .select(&tab_sel)
        .map(|tab| normalize_cell_text(&tab.text().collect::<String>()))
        .collect();

    if tabs.is_empty() {
        // Frame rendered with a single, already-selected panel.
        let visible = document
            .select(&visible_sel)
            .next()
            .context("Could not find year tabs in listing frame")?;
        tracing::debug!("No tab group; using the visible panel");
        return Ok(visible.inner_html());
    }

    let wanted = year.to_string();
    let position = tabs
        .iter()
        .position(|label| *label == wanted)
        .with_context(|| format!("Could not find tab for year {year}."))?;
    tracing::debug!(year = %year, position, tabs = tabs.len(), "Selected year tab");

    let mut panels: Vec<ElementRef> = document.select(&grouped_panel_sel).collect();
    if panels.is_empty() {
        panels = document.select(&panel_sel).collect();
    }

    panels
        .get(position)
        .map(|panel| panel.inner_html())
        .with_context(|| format!("Tab for year {year} has no content panel"))
}

/// Extract case rows from a year panel.
///
/// Rows with fewer than five cells are layout, not cases, and are dropped.
/// Rows whose video cell has no parseable `window.open(...)` link are kept
/// with `player_url: None` so the run can report them.
pub fn extract_cases(panel_html: &str, base: &Url) -> Vec<CaseEntry> {
    let fragment = Html::parse_fragment(panel_html);
    let row_sel = Selector::parse("tr.listingRow").expect("valid selector");
    let link_sel = Selector::parse("a").expect("valid selector");
    let onclick = Regex::new(ONCLICK_PATTERN).expect("valid regex");

    let mut cases = Vec::new();
    for row in fragment.select(&row_sel) {
        let cells: Vec<ElementRef> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "td")
            .collect();
        if cells.len() < MIN_ROW_CELLS {
            continue;
        }

        let name = normalize_cell_text(&cells[NAME_CELL].text().collect::<String>());
        let player_url = cells[VIDEO_CELL]
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("onclick"))
            .and_then(|handler| onclick.captures(handler))
            .and_then(|caps| resolve_player_url(&caps[1], base));

        if player_url.is_none() {
            tracing::debug!(case = %name, "Listing row has no usable video link");
        }

        cases.push(CaseEntry {
            index: cases.len() + 1,
            name,
            player_url,
        });
    }

    cases
}

/// Resolve a `window.open` target; protocol-relative links are forced to https.
fn resolve_player_url(raw: &str, base: &Url) -> Option<String> {
    let link = raw.trim().replace("&amp;", "&");
    if link.is_empty() {
        return None;
    }
    let link = if link.starts_with("//") {
        format!("https:{link}")
    } else {
        link
    };
    base.join(&link).ok().map(String::from)
}
