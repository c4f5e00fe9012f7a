//! Pure projection from session state to renderable data.
//!
//! Nothing here mutates state or performs I/O. Renderers (the terminal
//! printer in the application crate, a future web front end) consume these
//! views instead of reaching into the controller and cache directly.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::breaking::{BreakingFeed, UrgencyTier};
use crate::controller::SearchController;
use crate::enrichment::{EnrichmentCache, FetchState};
use crate::featured::FeaturedFeed;
use crate::models::{Article, RelatedArticle, SentimentLabel};

/// Source name shown when the article has none.
pub const DEFAULT_SOURCE_NAME: &str = "News";

/// Novel entities listed per banner line.
pub const MAX_BANNER_ENTITIES: usize = 3;

/// Display glyph for a sentiment tone.
pub fn tone_glyph(label: SentimentLabel) -> Option<char> {
    match label {
        SentimentLabel::Positive => Some('↑'),
        SentimentLabel::Negative => Some('↓'),
        SentimentLabel::Neutral => Some('→'),
        SentimentLabel::Unknown => None,
    }
}

/// Color name for a sentiment tone.
pub fn tone_color(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "green",
        SentimentLabel::Negative => "red",
        SentimentLabel::Neutral => "gray",
        SentimentLabel::Unknown => "dim",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentBadge {
    pub tone: SentimentLabel,
    pub glyph: Option<char>,
    pub color: &'static str,
    /// Classifier confidence as a whole percentage.
    pub confidence: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryPanel {
    Hidden,
    Loading,
    Text(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RelatedPanel {
    Hidden,
    Loading,
    Items(Vec<RelatedArticle>),
    Error(String),
}

/// One result item ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleView {
    /// 1-based position in the current result set.
    pub index: usize,
    pub id: String,
    pub title: String,
    pub url: String,
    pub source_name: String,
    pub published: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sentiment: Option<SentimentBadge>,
    pub summary: SummaryPanel,
    pub related: RelatedPanel,
    /// False only while a summary request is running.
    pub can_summarize: bool,
    pub related_open: bool,
}

/// Pager line: `< 1 ... 4 5 [6] 7 8 ... 20 >`.
#[derive(Debug, Clone, PartialEq)]
pub struct PagerView {
    pub current: u32,
    pub total: u32,
    pub window: Vec<u32>,
    /// Page 1, when the window does not reach it.
    pub first: Option<u32>,
    /// Pages missing between `first` and the window.
    pub leading_gap: bool,
    /// The last page, when the window does not reach it.
    pub last: Option<u32>,
    /// Pages missing between the window and `last`.
    pub trailing_gap: bool,
    pub has_previous: bool,
    pub has_next: bool,
    /// `"N results for 'q'"`, once a search has succeeded.
    pub meta_line: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BannerLine {
    pub key: String,
    pub tier: UrgencyTier,
    pub title: String,
    pub source: String,
    pub time_ago: Option<String>,
    pub article_count: u32,
    pub novel_entities: Vec<String>,
}

pub fn project_results(
    controller: &SearchController,
    cache: &EnrichmentCache,
) -> Vec<ArticleView> {
    controller
        .results()
        .iter()
        .zip(controller.keys())
        .enumerate()
        .map(|(i, (article, key))| project_article(i + 1, key, article, cache))
        .collect()
}

fn project_article(
    index: usize,
    key: &str,
    article: &Article,
    cache: &EnrichmentCache,
) -> ArticleView {
    let summary_state = cache.summary(key);
    let summary = match summary_state {
        None | Some(FetchState::Absent) => SummaryPanel::Hidden,
        Some(FetchState::Pending) => SummaryPanel::Loading,
        Some(FetchState::Resolved(text)) => SummaryPanel::Text(text.clone()),
        Some(FetchState::Failed(msg)) => SummaryPanel::Error(msg.clone()),
    };
    let related_open = cache.related_visible(key);
    let related = if !related_open {
        RelatedPanel::Hidden
    } else {
        match cache.related(key) {
            None | Some(FetchState::Absent) => RelatedPanel::Hidden,
            Some(FetchState::Pending) => RelatedPanel::Loading,
            Some(FetchState::Resolved(items)) => RelatedPanel::Items(items.clone()),
            Some(FetchState::Failed(msg)) => RelatedPanel::Error(msg.clone()),
        }
    };

    ArticleView {
        summary,
        related,
        can_summarize: !summary_state.is_some_and(FetchState::is_pending),
        related_open,
        ..article_card(index, key, article)
    }
}

/// Featured articles revealed so far. Featured cards carry no enrichment.
pub fn project_featured(feed: &FeaturedFeed) -> Vec<ArticleView> {
    feed.shown()
        .enumerate()
        .map(|(i, (key, article))| article_card(i + 1, key, article))
        .collect()
}

fn article_card(index: usize, key: &str, article: &Article) -> ArticleView {
    ArticleView {
        index,
        id: key.to_string(),
        title: article.title.clone(),
        url: article.url.clone(),
        source_name: article
            .source_name()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_SOURCE_NAME)
            .to_string(),
        published: published_date(&article.published_at),
        description: article.description.clone(),
        image_url: article.url_to_image.clone(),
        sentiment: article.sentiment.as_ref().map(|s| SentimentBadge {
            tone: s.label,
            glyph: tone_glyph(s.label),
            color: tone_color(s.label),
            confidence: s.score.map(|score| (score.clamp(0.0, 1.0) * 100.0).round() as u8),
        }),
        summary: SummaryPanel::Hidden,
        related: RelatedPanel::Hidden,
        can_summarize: true,
        related_open: false,
    }
}

pub fn project_pager(controller: &SearchController) -> PagerView {
    let current = controller.current_page();
    let total = controller.total_pages();
    let window = controller.page_window();
    let start = window.first().copied().unwrap_or(1);
    let end = window.last().copied().unwrap_or(total);
    PagerView {
        current,
        total,
        first: (start > 1).then_some(1),
        leading_gap: start > 2,
        last: (end < total).then_some(total),
        trailing_gap: end.saturating_add(1) < total,
        window,
        has_previous: total > 0 && current > 1,
        has_next: current < total,
        meta_line: controller
            .meta()
            .map(|m| format!("{} results for '{}'", m.total_results, m.q)),
        loading: controller.is_loading(),
        error: controller
            .last_error()
            .filter(|e| !e.is_silent())
            .map(|e| e.user_message()),
    }
}

pub fn project_breaking(feed: &BreakingFeed, now: DateTime<Utc>) -> Vec<BannerLine> {
    feed.visible()
        .iter()
        .map(|story| BannerLine {
            key: story.url.clone(),
            tier: UrgencyTier::from_score(story.score),
            title: story.title.clone(),
            source: story.source.clone(),
            time_ago: story.detected_at.as_deref().and_then(|ts| time_ago(ts, now)),
            article_count: story.article_count,
            novel_entities: story
                .novel_entities
                .iter()
                .take(MAX_BANNER_ENTITIES)
                .cloned()
                .collect(),
        })
        .collect()
}

/// Parse an RFC 3339 timestamp, or a naive one interpreted as UTC.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let ts = ts.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Relative label for `ts` as seen at `now`. Future timestamps read as
/// "just now".
pub fn time_ago(ts: &str, now: DateTime<Utc>) -> Option<String> {
    let then = parse_timestamp(ts)?;
    let minutes = (now - then).num_minutes();
    let label = match minutes {
        m if m < 1 => "just now".to_string(),
        1 => "1 min ago".to_string(),
        m if m < 60 => format!("{} min ago", m),
        m if m < 120 => "1 hour ago".to_string(),
        m => format!("{} hours ago", m / 60),
    };
    Some(label)
}

/// Publication date as `Jan 2, 2025`; unparseable input is shown verbatim.
pub fn published_date(ts: &str) -> String {
    match parse_timestamp(ts) {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => ts.to_string(),
    }
}
