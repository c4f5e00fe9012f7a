//! Plain-text rendering of views and feeds for the terminal.
//!
//! Every function returns a `String` so commands decide where it goes and
//! tests can assert on the exact text.

use news_pulse_core::featured::FeedStats;
use news_pulse_core::models::{EntityReport, TopicReport, Trend};
use news_pulse_core::view::{ArticleView, BannerLine, PagerView, RelatedPanel, SummaryPanel};

/// Trends shown by `pulse trends`.
pub const TOP_TRENDS: usize = 8;
/// Entities listed per kind by `pulse entities`.
pub const TOP_ENTITIES: usize = 5;
/// Keywords listed per topic.
pub const TOPIC_KEYWORDS: usize = 5;
/// Sample articles listed per topic.
pub const TOPIC_SAMPLES: usize = 2;

pub fn article(view: &ArticleView) -> String {
    let mut out = String::new();
    let badge = match &view.sentiment {
        Some(badge) => {
            let glyph = badge.glyph.map(|g| g.to_string()).unwrap_or_else(|| "?".to_string());
            match badge.confidence {
                Some(pct) => format!("[{} {}%] ", glyph, pct),
                None => format!("[{}] ", glyph),
            }
        }
        None => String::new(),
    };
    out.push_str(&format!(
        "{}. {}{} / {}\n",
        view.index, badge, view.source_name, view.title
    ));
    if !view.published.is_empty() {
        out.push_str(&format!("    published: {}\n", view.published));
    }
    out.push_str(&format!("    url: {}\n", view.url));
    if let Some(desc) = view.description.as_deref().filter(|d| !d.trim().is_empty()) {
        out.push_str(&format!("    excerpt: \"{}\"\n", desc.replace('\n', " ").trim()));
    }

    match &view.summary {
        SummaryPanel::Hidden => {}
        SummaryPanel::Loading => out.push_str("    summary: (summarizing...)\n"),
        SummaryPanel::Text(text) => out.push_str(&format!("    summary: {}\n", text.trim())),
        SummaryPanel::Error(msg) => out.push_str(&format!("    summary failed: {}\n", msg)),
    }

    match &view.related {
        RelatedPanel::Hidden => {}
        RelatedPanel::Loading => out.push_str("    related: (loading...)\n"),
        RelatedPanel::Items(items) if items.is_empty() => {
            out.push_str("    related: none found\n")
        }
        RelatedPanel::Items(items) => {
            out.push_str("    related:\n");
            for item in items {
                out.push_str(&format!(
                    "      - [{:.0}%] {} / {}\n        {}\n",
                    item.similarity * 100.0,
                    item.source,
                    item.title,
                    item.url
                ));
            }
        }
        RelatedPanel::Error(msg) => out.push_str(&format!("    related failed: {}\n", msg)),
    }
    out
}

pub fn results(views: &[ArticleView]) -> String {
    if views.is_empty() {
        return "No results.\n".to_string();
    }
    views
        .iter()
        .map(|v| format!("{}\n", article(v)))
        .collect()
}

/// Featured cards, then a hint while part of the feed is still hidden.
pub fn featured(views: &[ArticleView], remaining: usize, next_more: usize) -> String {
    let mut out = results(views);
    if remaining > 0 {
        out.push_str(&format!(
            "{} more featured (pulse home --more {})\n",
            remaining, next_more
        ));
    }
    out
}

pub fn feed_stats(stats: &FeedStats, trending: usize) -> String {
    format!(
        "latest: {}  trending topics: {}  ML analyzed: {}  avg confidence: {}%\n\
         sentiment: {} positive, {} negative, {} neutral\n",
        stats.latest,
        trending,
        stats.analyzed,
        stats.average_confidence,
        stats.positive,
        stats.negative,
        stats.neutral
    )
}

pub fn pager(view: &PagerView) -> String {
    let mut out = String::new();
    if let Some(meta) = &view.meta_line {
        out.push_str(meta);
        out.push('\n');
    }
    if view.total > 1 {
        let mut pages: Vec<String> = Vec::new();
        if let Some(first) = view.first {
            pages.push(first.to_string());
        }
        if view.leading_gap {
            pages.push("...".to_string());
        }
        pages.extend(view.window.iter().map(|&n| {
            if n == view.current {
                format!("[{}]", n)
            } else {
                n.to_string()
            }
        }));
        if view.trailing_gap {
            pages.push("...".to_string());
        }
        if let Some(last) = view.last {
            pages.push(last.to_string());
        }
        out.push_str(&format!(
            "page {} of {}: {}{}{}\n",
            view.current,
            view.total,
            if view.has_previous { "< " } else { "" },
            pages.join(" "),
            if view.has_next { " >" } else { "" }
        ));
    }
    if let Some(err) = &view.error {
        out.push_str(&format!("error: {}\n", err));
    }
    out
}

pub fn banner(lines: &[BannerLine]) -> String {
    if lines.is_empty() {
        return "No breaking news.\n".to_string();
    }
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} {} / {}",
            i + 1,
            line.tier.label(),
            line.source,
            line.title
        ));
        if let Some(ago) = &line.time_ago {
            out.push_str(&format!(" ({})", ago));
        }
        out.push('\n');
        out.push_str(&format!("    {} articles", line.article_count));
        if !line.novel_entities.is_empty() {
            out.push_str(&format!(", new: {}", line.novel_entities.join(", ")));
        }
        out.push('\n');
    }
    out
}

pub fn trends(trends: &[Trend]) -> String {
    if trends.is_empty() {
        return "No trends.\n".to_string();
    }
    let mut out = String::new();
    for (i, trend) in trends.iter().take(TOP_TRENDS).enumerate() {
        let growth = match (trend.is_new, trend.growth) {
            (true, _) | (false, None) => "new".to_string(),
            (false, Some(g)) => format!("{:+.0}%", g * 100.0),
        };
        out.push_str(&format!(
            "{}. {} ({}, {} mentions)\n",
            i + 1,
            trend.keyword,
            growth,
            trend.current_count
        ));
    }
    out
}

pub fn entities(report: &EntityReport) -> String {
    let mut out = String::new();
    for (kind, ranked) in report {
        if ranked.is_empty() {
            continue;
        }
        let names: Vec<String> = ranked
            .iter()
            .take(TOP_ENTITIES)
            .map(|(name, count)| format!("{} ({})", name, count))
            .collect();
        out.push_str(&format!("{}: {}\n", kind, names.join(", ")));
    }
    if out.is_empty() {
        out.push_str("No entities.\n");
    }
    out
}

pub fn topics(report: &TopicReport) -> String {
    let mut out = String::new();
    if let Some(err) = &report.error {
        out.push_str(&format!("error: {}\n", err));
    }
    if report.topics.is_empty() {
        out.push_str(report.message.as_deref().unwrap_or("No topics."));
        out.push('\n');
        return out;
    }
    for topic in &report.topics {
        out.push_str(&format!("{} ({} articles)\n", topic.label, topic.article_count));
        let keywords: Vec<&str> = topic
            .keywords
            .iter()
            .take(TOPIC_KEYWORDS)
            .map(String::as_str)
            .collect();
        if !keywords.is_empty() {
            out.push_str(&format!("    keywords: {}\n", keywords.join(", ")));
        }
        for sample in topic.sample_articles.iter().take(TOPIC_SAMPLES) {
            out.push_str(&format!("    - {} / {}\n", sample.source, sample.title));
        }
    }
    out.push_str(&format!(
        "{} of {} articles uncategorized\n",
        report.uncategorized_count, report.total_articles
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use news_pulse_core::breaking::UrgencyTier;
    use news_pulse_core::models::{RelatedArticle, SentimentLabel, Topic, TopicSample};
    use news_pulse_core::view::SentimentBadge;

    fn view() -> ArticleView {
        ArticleView {
            index: 1,
            id: "https://news.example/1".to_string(),
            title: "Chips".to_string(),
            url: "https://news.example/1".to_string(),
            source_name: "Wire".to_string(),
            published: "Jan 2, 2025".to_string(),
            description: Some("About\nchips".to_string()),
            image_url: None,
            sentiment: Some(SentimentBadge {
                tone: SentimentLabel::Positive,
                glyph: Some('↑'),
                color: "green",
                confidence: Some(93),
            }),
            summary: SummaryPanel::Hidden,
            related: RelatedPanel::Hidden,
            can_summarize: true,
            related_open: false,
        }
    }

    #[test]
    fn article_header_and_excerpt() {
        let text = article(&view());
        assert!(text.starts_with("1. [↑ 93%] Wire / Chips\n"));
        assert!(text.contains("    excerpt: \"About chips\"\n"));
        assert!(!text.contains("summary"));
    }

    #[test]
    fn article_panels() {
        let mut v = view();
        v.summary = SummaryPanel::Error("Summarization failed".to_string());
        v.related = RelatedPanel::Items(vec![RelatedArticle {
            title: "More chips".to_string(),
            url: "https://r.example".to_string(),
            source: "Daily".to_string(),
            similarity: 0.82,
        }]);
        let text = article(&v);
        assert!(text.contains("    summary failed: Summarization failed\n"));
        assert!(text.contains("      - [82%] Daily / More chips\n"));
    }

    #[test]
    fn pager_marks_current_page() {
        let text = pager(&PagerView {
            current: 2,
            total: 5,
            window: vec![1, 2, 3, 4],
            first: None,
            leading_gap: false,
            last: Some(5),
            trailing_gap: false,
            has_previous: true,
            has_next: true,
            meta_line: Some("237 results for 'technology'".to_string()),
            loading: false,
            error: None,
        });
        assert_eq!(
            text,
            "237 results for 'technology'\npage 2 of 5: < 1 [2] 3 4 5 >\n"
        );
    }

    #[test]
    fn pager_elides_distant_pages() {
        let text = pager(&PagerView {
            current: 10,
            total: 20,
            window: vec![8, 9, 10, 11, 12],
            first: Some(1),
            leading_gap: true,
            last: Some(20),
            trailing_gap: true,
            has_previous: true,
            has_next: true,
            meta_line: None,
            loading: false,
            error: None,
        });
        assert_eq!(text, "page 10 of 20: < 1 ... 8 9 [10] 11 12 ... 20 >\n");
    }

    #[test]
    fn banner_lists_tiers() {
        let text = banner(&[BannerLine {
            key: "u".to_string(),
            tier: UrgencyTier::Urgent,
            title: "Quake".to_string(),
            source: "Wire".to_string(),
            time_ago: Some("5 min ago".to_string()),
            article_count: 7,
            novel_entities: vec!["Chile".to_string()],
        }]);
        assert_eq!(text, "1. URGENT Wire / Quake (5 min ago)\n    7 articles, new: Chile\n");
        assert_eq!(banner(&[]), "No breaking news.\n");
    }

    #[test]
    fn trends_show_growth() {
        let rows: Vec<Trend> = (0..10)
            .map(|n| Trend {
                keyword: format!("k{}", n),
                current_count: 10,
                previous_count: 5,
                growth: Some(1.0),
                is_new: n == 0,
            })
            .collect();
        let text = trends(&rows);
        assert_eq!(text.lines().count(), TOP_TRENDS);
        assert!(text.starts_with("1. k0 (new, 10 mentions)\n2. k1 (+100%, 10 mentions)\n"));
    }

    #[test]
    fn topics_cap_keywords_and_samples() {
        let report = TopicReport {
            topics: vec![Topic {
                topic_id: 0,
                label: "Chips & AI".to_string(),
                keywords: (0..8).map(|n| format!("w{}", n)).collect(),
                article_count: 20,
                sample_articles: (0..3)
                    .map(|n| TopicSample {
                        title: format!("t{}", n),
                        url: String::new(),
                        source: "Wire".to_string(),
                    })
                    .collect(),
            }],
            uncategorized_count: 4,
            total_articles: 24,
            message: None,
            error: None,
        };
        let text = topics(&report);
        assert!(text.contains("    keywords: w0, w1, w2, w3, w4\n"));
        assert_eq!(text.matches("    - Wire").count(), TOPIC_SAMPLES);
        assert!(text.ends_with("4 of 24 articles uncategorized\n"));
    }

    #[test]
    fn featured_hints_at_hidden_cards() {
        let views = vec![view()];
        let text = featured(&views, 6, 1);
        assert!(text.starts_with("1. [↑ 93%] Wire / Chips\n"));
        assert!(text.ends_with("\n6 more featured (pulse home --more 1)\n"));
        assert!(!featured(&views, 0, 2).contains("more featured"));
    }

    #[test]
    fn feed_stats_lines() {
        let stats = FeedStats {
            latest: 12,
            analyzed: 10,
            average_confidence: 88,
            positive: 6,
            negative: 3,
            neutral: 1,
        };
        assert_eq!(
            feed_stats(&stats, 2),
            "latest: 12  trending topics: 2  ML analyzed: 10  avg confidence: 88%\n\
             sentiment: 6 positive, 3 negative, 1 neutral\n"
        );
    }

    #[test]
    fn empty_feeds() {
        assert_eq!(entities(&EntityReport::new()), "No entities.\n");
        assert_eq!(topics(&TopicReport::default()), "No topics.\n");
        assert_eq!(results(&[]), "No results.\n");
    }
}
