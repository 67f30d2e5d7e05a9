//! Plain-text rendering of the result page.

use std::time::Duration;

use vidinsight_core::{AnalysisResult, SentimentAnalysis, SubResult, VideoAnalysis};

use crate::results::{ResultPage, ViewState};
use crate::truncate_string;

pub const STILL_PROCESSING: &str = "still processing";
pub const NOT_AVAILABLE: &str = "no analysis available";
pub const LOADING: &str = "Loading...";
pub const ERROR_TITLE: &str = "Error";
pub const ERROR_MESSAGE: &str = "Sorry, we couldn't process your video. Please try again.";

const BAR_WIDTH: usize = 20;
const MAX_NAME_WIDTH: usize = 60;

/// Whole page, including the auto-refresh status line.
pub fn render_page(page: &ResultPage) -> String {
    let mut lines = vec![render_view(page.state())];
    let auto = if page.auto_refresh_enabled() { "on" } else { "off" };
    let progress = match page.state() {
        ViewState::Loaded(result) if result.is_complete() => " (analysis complete)",
        _ => "",
    };
    lines.push(format!(
        "[/{}]{} auto-refresh {} | r retry, a toggle auto-refresh, o <id> open, q quit",
        page.id(),
        progress,
        auto
    ));
    lines.join("\n")
}

/// Loading, then error, then the loaded sections.
pub fn render_view(state: &ViewState) -> String {
    match state {
        ViewState::Loading => LOADING.to_string(),
        ViewState::Error(e) => format!("{}\n{}\n({})", ERROR_TITLE, ERROR_MESSAGE, e),
        ViewState::Loaded(result) => render_result(result),
    }
}

pub fn render_result(result: &AnalysisResult) -> String {
    let mut lines = vec!["Analysis Results".to_string()];
    if let Some(name) = &result.name {
        lines.push(format!("Video: {}", truncate_string(name, MAX_NAME_WIDTH)));
    }
    lines.push(String::new());
    lines.extend(section("Video Analysis", &result.video, video_lines));
    lines.push(String::new());
    lines.extend(section("Sentiment Analysis", &result.sentiment, sentiment_lines));
    lines.push(String::new());
    lines.extend(section("Transcription", &result.transcript, |text: &String| {
        vec![text.clone()]
    }));
    lines.join("\n")
}

fn section<T>(title: &str, sub: &SubResult<T>, ready: impl Fn(&T) -> Vec<String>) -> Vec<String> {
    let mut lines = vec![format!("== {} ==", title)];
    match sub {
        SubResult::Pending => lines.push(STILL_PROCESSING.to_string()),
        SubResult::NotApplicable => lines.push(NOT_AVAILABLE.to_string()),
        SubResult::Ready(value) => lines.extend(ready(value)),
    }
    lines
}

fn video_lines(video: &VideoAnalysis) -> Vec<String> {
    let meta = &video.video_metadata;
    let mut lines = vec![
        format!("Duration: {}", format_duration(meta.duration())),
        format!("Resolution: {}", meta.resolution()),
        format!("Frame rate: {:.2} fps", meta.frame_rate),
    ];

    if video.labels.is_empty() {
        lines.push("No labels detected".to_string());
        return lines;
    }

    lines.push("Label timeline:".to_string());
    for frame in &video.labels {
        lines.push(format!("  @ {:.2}s", frame.timestamp_seconds));
        for label in frame.sorted_labels() {
            lines.push(format!("    {:<28} {:>6.2}%", label.name, label.confidence));
        }
    }
    lines
}

fn sentiment_lines(analysis: &SentimentAnalysis) -> Vec<String> {
    let mut lines = vec![format!("Sentiment: {}", analysis.sentiment)];
    for (class, percent) in analysis.percentages() {
        lines.push(format!(
            "  {:<9} {} {:>5.1}%",
            class,
            percentage_bar(percent, BAR_WIDTH),
            percent
        ));
    }
    lines
}

/// `[####......]` filled in proportion to `percent` (0-100).
pub fn percentage_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    let minutes = total_ms / 60_000;
    let seconds = (total_ms % 60_000) as f64 / 1000.0;
    format!("{}:{:06.3}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::ResultError;
    use serde_json::json;

    fn result(value: serde_json::Value) -> AnalysisResult {
        AnalysisResult::from_value(value).unwrap()
    }

    fn section_body<'a>(rendered: &'a str, title: &str) -> Vec<&'a str> {
        let header = format!("== {} ==", title);
        rendered
            .lines()
            .skip_while(|line| *line != header)
            .skip(1)
            .take_while(|line| !line.is_empty())
            .collect()
    }

    #[test]
    fn empty_document_renders_all_sections_processing() {
        let rendered = render_result(&result(json!({})));
        for title in ["Video Analysis", "Sentiment Analysis", "Transcription"] {
            assert_eq!(section_body(&rendered, title), vec![STILL_PROCESSING]);
        }
    }

    #[test]
    fn comprehend_exists_false_renders_not_available() {
        let rendered = render_result(&result(json!({"comprehend": {"exists": false}})));
        assert_eq!(section_body(&rendered, "Sentiment Analysis"), vec![NOT_AVAILABLE]);
        assert_eq!(section_body(&rendered, "Video Analysis"), vec![STILL_PROCESSING]);
        assert_eq!(section_body(&rendered, "Transcription"), vec![STILL_PROCESSING]);
    }

    #[test]
    fn label_frames_render_by_descending_confidence() {
        let rendered = render_result(&result(json!({
            "rekognition": {
                "videoMetadata": {"DurationMillis": 65250, "FrameWidth": 1920, "FrameHeight": 1080, "FrameRate": 30.0},
                "labels": [
                    {"timestampSeconds": 0.0, "detectedLabels": [
                        {"name": "Sky", "confidence": 55.5},
                        {"name": "Person", "confidence": 99.0},
                        {"name": "Beach", "confidence": 80.25}
                    ]},
                    {"timestampSeconds": 1.5, "detectedLabels": [
                        {"name": "Wave", "confidence": 61.0},
                        {"name": "Sand", "confidence": 97.0}
                    ]}
                ]
            }
        })));

        let body = section_body(&rendered, "Video Analysis");
        assert_eq!(body[0], "Duration: 1:05.250");
        assert_eq!(body[1], "Resolution: 1920x1080");

        let order: Vec<&str> = body
            .iter()
            .filter(|line| line.starts_with("    "))
            .map(|line| line.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(order, vec!["Person", "Beach", "Sky", "Sand", "Wave"]);
    }

    #[test]
    fn sentiment_renders_label_and_bars() {
        let rendered = render_result(&result(json!({
            "comprehend": {"exists": true, "data": {
                "Sentiment": "POSITIVE",
                "SentimentScore": {"Positive": 0.75, "Negative": 0.05, "Neutral": 0.15, "Mixed": 0.05}
            }}
        })));
        let body = section_body(&rendered, "Sentiment Analysis");
        assert_eq!(body[0], "Sentiment: POSITIVE");
        assert_eq!(body.len(), 5);
        assert!(body[1].contains("Positive"));
        assert!(body[1].contains("[###############.....]"));
        assert!(body[1].ends_with("75.0%"));
    }

    #[test]
    fn transcript_renders_raw_text() {
        let rendered = render_result(&result(json!({
            "name": "Beach Day.mp4",
            "transcribe": {"exists": true, "data": "welcome to the beach"}
        })));
        assert!(rendered.contains("Video: Beach Day.mp4"));
        assert_eq!(
            section_body(&rendered, "Transcription"),
            vec!["welcome to the beach"]
        );
    }

    #[test]
    fn view_states_render_in_priority_order() {
        assert_eq!(render_view(&ViewState::Loading), LOADING);
        let error = render_view(&ViewState::Error(ResultError::Server));
        assert!(error.starts_with(ERROR_TITLE));
        assert!(error.contains(ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn status_line_marks_complete_analysis() {
        use crate::test_helpers::{FakeGateway, Scripted};
        use std::sync::Arc;

        let gateway = Arc::new(FakeGateway::new().with_results(
            "abc",
            vec![
                Scripted::Document(json!({})),
                Scripted::Document(json!({
                    "rekognition": {"exists": false},
                    "comprehend": {"exists": false},
                    "transcribe": {"exists": true, "data": "done"}
                })),
            ],
        ));
        let mut page = ResultPage::new(gateway, "abc", Duration::from_secs(10));

        page.refresh().await;
        let status = render_page(&page);
        assert!(status.ends_with("q quit"));
        assert!(!status.contains("analysis complete"));

        page.refresh().await;
        assert!(render_page(&page).contains("[/abc] (analysis complete) auto-refresh off"));
    }

    #[test]
    fn percentage_bar_bounds() {
        assert_eq!(percentage_bar(0.0, 4), "[....]");
        assert_eq!(percentage_bar(100.0, 4), "[####]");
        assert_eq!(percentage_bar(150.0, 4), "[####]");
        assert_eq!(percentage_bar(50.0, 4), "[##..]");
    }
}
