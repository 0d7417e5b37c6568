//! Result cards
//!
//! Pure mapping from a [`Lecture`] to a view description. The TUI and the
//! plain-text CLI output both draw from these, so nothing here touches a
//! terminal.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::{FilterKind, Lecture};

/// Message shown when a fresh search matches nothing
pub const NO_RESULTS_MESSAGE: &str = "No lectures found matching your criteria.";

/// Message shown when a search request fails
pub const ERROR_MESSAGE: &str = "An error occurred while searching. Please try again.";

/// A clickable label on a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub kind: BadgeKind,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeKind {
    Topic,
    Tag,
    Rank,
}

impl BadgeKind {
    /// Filter the badge re-applies when clicked
    pub fn filter_kind(&self) -> FilterKind {
        match self {
            BadgeKind::Topic => FilterKind::Topic,
            BadgeKind::Tag => FilterKind::Tag,
            BadgeKind::Rank => FilterKind::Rank,
        }
    }
}

impl Badge {
    pub fn new(kind: BadgeKind, label: &str) -> Self {
        Self {
            kind,
            label: label.to_string(),
        }
    }
}

/// Everything needed to draw one lecture
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LectureCard {
    pub title: String,
    /// Passed to the video overlay when the thumbnail is activated
    pub video_id: String,
    pub thumbnail_url: Option<String>,
    /// Human-readable publish date, empty when unknown
    pub date_label: String,
    pub rank: Option<Badge>,
    /// Topic badges followed by tag badges, in server order
    pub badges: Vec<Badge>,
}

impl LectureCard {
    /// Badges in on-screen order: rank first, then topics and tags
    pub fn all_badges(&self) -> impl Iterator<Item = &Badge> {
        self.rank.iter().chain(self.badges.iter())
    }
}

/// What the result area currently shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultView {
    /// Nothing searched yet
    #[default]
    Idle,
    /// A fresh search is in flight; previous results were cleared
    Loading,
    /// Rendered cards
    Cards(Vec<LectureCard>),
    /// A fresh search returned zero lectures
    Empty(String),
    /// The last request failed
    Error(String),
}

impl ResultView {
    pub fn cards(&self) -> &[LectureCard] {
        match self {
            ResultView::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ResultView::Empty(msg) | ResultView::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResultView::Error(_))
    }
}

/// Map a lecture to its card
pub fn render_card(lecture: &Lecture) -> LectureCard {
    let badges = lecture
        .topics
        .iter()
        .map(|t| Badge::new(BadgeKind::Topic, t))
        .chain(lecture.tags.iter().map(|t| Badge::new(BadgeKind::Tag, t)))
        .collect();

    LectureCard {
        title: lecture.title.clone(),
        video_id: lecture.youtube_id.clone(),
        thumbnail_url: lecture.thumbnail_url.clone(),
        date_label: lecture
            .publish_date
            .as_deref()
            .map(format_publish_date)
            .unwrap_or_default(),
        rank: lecture
            .rank
            .as_deref()
            .filter(|r| !r.is_empty())
            .map(|r| Badge::new(BadgeKind::Rank, r)),
        badges,
    }
}

/// Format an ISO date, ISO datetime, RFC 3339 or RFC 2822 timestamp as
/// `Mar 5, 2024`. Anything unparsable is returned as given.
pub fn format_publish_date(raw: &str) -> String {
    const FORMAT: &str = "%b %-d, %Y";
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(FORMAT).to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format(FORMAT).to_string();
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.format(FORMAT).to_string();
    }

    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lecture(rank: Option<&str>) -> Lecture {
        Lecture {
            id: Some(1),
            title: "Ladder breakers".into(),
            youtube_id: "vid00001".into(),
            thumbnail_url: Some("https://img/1.jpg".into()),
            publish_date: Some("2023-11-02".into()),
            topics: vec!["Tactics".into(), "Middle game".into()],
            tags: vec!["ladder".into()],
            rank: rank.map(String::from),
        }
    }

    #[test]
    fn test_render_card_fields() {
        let card = render_card(&lecture(Some("5k")));
        assert_eq!(card.title, "Ladder breakers");
        assert_eq!(card.video_id, "vid00001");
        assert_eq!(card.thumbnail_url.as_deref(), Some("https://img/1.jpg"));
        assert_eq!(card.date_label, "Nov 2, 2023");
        assert_eq!(card.rank, Some(Badge::new(BadgeKind::Rank, "5k")));
    }

    #[test]
    fn test_render_card_badge_order() {
        let card = render_card(&lecture(None));
        let labels: Vec<_> = card.badges.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Tactics", "Middle game", "ladder"]);
        assert_eq!(card.badges[0].kind, BadgeKind::Topic);
        assert_eq!(card.badges[2].kind, BadgeKind::Tag);
    }

    #[test]
    fn test_render_card_omits_missing_rank() {
        assert!(render_card(&lecture(None)).rank.is_none());
        assert!(render_card(&lecture(Some(""))).rank.is_none());
        assert_eq!(render_card(&lecture(None)).all_badges().count(), 3);
        assert_eq!(render_card(&lecture(Some("1d"))).all_badges().count(), 4);
    }

    #[test]
    fn test_render_card_without_date() {
        let mut l = lecture(None);
        l.publish_date = None;
        assert_eq!(render_card(&l).date_label, "");
    }

    #[test]
    fn test_format_publish_date_variants() {
        assert_eq!(format_publish_date("2024-03-05"), "Mar 5, 2024");
        assert_eq!(format_publish_date("2024-03-05T10:30:00"), "Mar 5, 2024");
        assert_eq!(format_publish_date("2024-03-05T10:30:00Z"), "Mar 5, 2024");
        assert_eq!(format_publish_date("2024-03-05 10:30:00.123"), "Mar 5, 2024");
        assert_eq!(
            format_publish_date("Tue, 05 Mar 2024 10:30:00 GMT"),
            "Mar 5, 2024"
        );
        assert_eq!(format_publish_date("sometime"), "sometime");
    }

    #[test]
    fn test_result_view_accessors() {
        assert!(ResultView::Idle.cards().is_empty());
        assert_eq!(
            ResultView::Empty(NO_RESULTS_MESSAGE.into()).message(),
            Some(NO_RESULTS_MESSAGE)
        );
        assert!(ResultView::Error(ERROR_MESSAGE.into()).is_error());
        let view = ResultView::Cards(vec![render_card(&lecture(None))]);
        assert_eq!(view.cards().len(), 1);
        assert!(view.message().is_none());
    }
}
