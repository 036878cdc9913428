use podium_core::analysis::{SegmentReport, TranscriptAnalysis};
use podium_core::cluster::TopicCluster;
use podium_core::stats::Correlation;
use podium_core::validate::ValidationOutcome;
use podium_core::{Audience, Scorer, SentenceScore, TrendPoint};

/// Render a full single-transcript report as plain text.
pub fn render_analysis(
    analysis: &TranscriptAnalysis,
    clusters: &[TopicCluster],
    keyword: Option<(&str, &[SentenceScore])>,
) -> String {
    let mut out = String::new();

    push_segment(&mut out, &analysis.opening);
    out.push('\n');
    push_segment(&mut out, &analysis.qa);
    out.push('\n');

    let direction = if analysis.shift > 0.0 {
        "more positive"
    } else if analysis.shift < 0.0 {
        "more negative"
    } else {
        "unchanged"
    };
    out.push_str(&format!(
        "tone shift into Q&A: {:+.4} ({direction})\n",
        analysis.shift
    ));
    let test = &analysis.significance;
    out.push_str(&format!(
        "segment difference: t = {:.3}, p = {:.4}{}\n",
        test.statistic,
        test.p_value,
        if test.significant {
            " (significant)"
        } else {
            ""
        }
    ));

    if !analysis.highlights.positive.is_empty() || !analysis.highlights.negative.is_empty() {
        out.push_str("\nsharpest sentences:\n");
        for highlight in &analysis.highlights.positive {
            out.push_str(&format!(
                "  {:+.4} [{}] {}\n",
                highlight.compound,
                highlight.source.as_str(),
                highlight.text
            ));
        }
        for highlight in &analysis.highlights.negative {
            out.push_str(&format!(
                "  {:+.4} [{}] {}\n",
                highlight.compound,
                highlight.source.as_str(),
                highlight.text
            ));
        }
    }

    if !clusters.is_empty() {
        out.push_str("\nquestion themes:\n");
        for cluster in clusters {
            out.push_str(&format!(
                "  {}. {} ({} sentences, avg {:+.4})\n",
                cluster.id, cluster.label, cluster.member_count, cluster.average_sentiment
            ));
        }
    }

    if let Some((word, hits)) = keyword {
        out.push('\n');
        if hits.is_empty() {
            out.push_str(&format!("no sentences mention \"{word}\"\n"));
        } else {
            out.push_str(&format!("sentences mentioning \"{word}\":\n"));
            for sentence in hits {
                out.push_str(&format!("  {:+.4} {}\n", sentence.compound, sentence.text));
            }
        }
    }

    out
}

fn push_segment(out: &mut String, report: &SegmentReport) {
    out.push_str(&format!("{}\n", report.kind.as_str()));
    out.push_str(&format!(
        "  compound  {:+.4} ({})\n",
        report.score.compound,
        report.label.as_str()
    ));
    out.push_str(&format!(
        "  mix       pos {:.3} / neu {:.3} / neg {:.3}\n",
        report.score.positive, report.score.neutral, report.score.negative
    ));
    out.push_str(&format!(
        "  investor  {}\n",
        Scorer::interpret(report.score.compound, Audience::Investor)
    ));
    out.push_str(&format!(
        "  general   {}\n",
        Scorer::interpret(report.score.compound, Audience::General)
    ));
    out.push_str(&format!(
        "  certainty {:.2} ({}, {} certain / {} uncertain)\n",
        report.certainty.score,
        report.certainty.label.as_str(),
        report.certainty.certain_count,
        report.certainty.uncertain_count
    ));
    if !report.topics.is_empty() {
        out.push_str("  topics:\n");
        for topic in &report.topics {
            out.push_str(&format!("    {:<13} {:+.4}\n", topic.topic, topic.compound));
        }
    }
    if !report.flow.is_empty() {
        out.push_str("  flow:\n");
        for sentence in &report.flow {
            out.push_str(&format!(
                "    {:>2}. {:+.4}  {}\n",
                sentence.sequence, sentence.compound, sentence.text
            ));
        }
    }
}

/// Render the historical trend table, one dated transcript per line.
pub fn render_trend(points: &[TrendPoint], correlation: Option<&Correlation>) -> String {
    let mut out = String::new();
    out.push_str("date        compound  market   file\n");
    for point in points {
        let market = match point.market_change {
            Some(change) => format!("{change:+.2}%"),
            None => "-".to_string(),
        };
        out.push_str(&format!(
            "{}  {:+.4}   {:>7}  {}\n",
            point.date, point.compound, market, point.filename
        ));
    }
    if let Some(correlation) = correlation {
        out.push_str(&format!(
            "\nsentiment vs same-day market move: r = {:.3}, p = {:.4} ({})\n",
            correlation.r,
            correlation.p_value,
            correlation.strength().as_str()
        ));
    }
    out
}

/// Render the reference-classifier comparison.
pub fn render_validation(outcome: &ValidationOutcome) -> String {
    let mut out = String::new();
    out.push_str(&format!("classified {} sentences\n", outcome.samples.len()));
    for pair in &outcome.samples {
        out.push_str(&format!(
            "  internal {:+.4} / reference {:+.4}  {}\n",
            pair.internal, pair.reference, pair.text
        ));
    }
    let correlation = &outcome.correlation;
    out.push_str(&format!(
        "\nagreement: r = {:.3}, p = {:.4} ({})\n",
        correlation.r,
        correlation.p_value,
        correlation.strength().as_str()
    ));
    out
}
